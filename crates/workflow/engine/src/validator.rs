//! Graph validator: structural invariants of a workflow definition
//!
//! Validation is the mandatory gate between a freshly built (or
//! compiled) definition and anything that routes against it. It is a
//! pure function of the definition and stops at the first violation.
//!
//! Checks, in order:
//! 1. step ids are unique
//! 2. exactly one START step, at least one END step
//! 3. every transition references existing steps
//! 4. START has no incoming and END steps have no outgoing transitions
//! 5. every step is reachable from START
//! 6. the graph is acyclic
//! 7. fork transitions leave a GATEWAY, join transitions enter one

use routeflow_types::{StepId, StepKind, WorkflowDefinition, WorkflowError, WorkflowResult};
use std::collections::{HashMap, HashSet, VecDeque};

/// Validates workflow definitions against the structural invariants
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a definition, failing on the first violated invariant.
    ///
    /// Runs in O(|steps| + |transitions|).
    pub fn validate(&self, definition: &WorkflowDefinition) -> WorkflowResult<()> {
        // Unique ids
        let mut ids: HashSet<&str> = HashSet::with_capacity(definition.steps.len());
        for step in &definition.steps {
            if !ids.insert(step.id.as_str()) {
                return Err(WorkflowError::DuplicateStepId(step.id.clone()));
            }
        }

        // Exactly one START, at least one END
        let starts = definition.start_steps();
        let start = match starts.as_slice() {
            [] => return Err(WorkflowError::NoStartStep),
            [only] => *only,
            many => {
                return Err(WorkflowError::MultipleStartSteps {
                    count: many.len(),
                    ids: many.iter().map(|s| s.id.clone()).collect(),
                })
            }
        };
        let ends = definition.end_steps();
        if ends.is_empty() {
            return Err(WorkflowError::NoEndStep);
        }

        // Transition endpoints exist
        for transition in &definition.transitions {
            if !ids.contains(transition.source.as_str())
                || !ids.contains(transition.target.as_str())
            {
                return Err(WorkflowError::DanglingTransition {
                    source_id: transition.source.clone(),
                    target_id: transition.target.clone(),
                });
            }
        }

        let graph = Adjacency::build(definition, &ids);

        if graph.in_degree(start.id.as_str()) > 0 {
            return Err(WorkflowError::StartHasIncoming(start.id.clone()));
        }
        for end in &ends {
            if !graph.downstream(end.id.as_str()).is_empty() {
                return Err(WorkflowError::EndHasOutgoing(end.id.clone()));
            }
        }

        // Reachability from START
        let reachable = graph.reachable_from(start.id.as_str());
        if reachable.len() != ids.len() {
            let mut missing: Vec<StepId> = ids
                .iter()
                .filter(|id| !reachable.contains(*id))
                .map(|id| StepId::new(*id))
                .collect();
            missing.sort();
            return Err(WorkflowError::UnreachableSteps(missing));
        }

        if graph.has_cycle() {
            return Err(WorkflowError::CycleDetected);
        }

        // Fork/join discipline
        let kinds: HashMap<&str, StepKind> = definition
            .steps
            .iter()
            .map(|s| (s.id.as_str(), s.kind))
            .collect();
        for transition in &definition.transitions {
            if transition.is_parallel_fork
                && kinds.get(transition.source.as_str()) != Some(&StepKind::Gateway)
            {
                return Err(WorkflowError::MisplacedFork(transition.source.clone()));
            }
            if transition.is_parallel_join
                && kinds.get(transition.target.as_str()) != Some(&StepKind::Gateway)
            {
                return Err(WorkflowError::MisplacedJoin(transition.target.clone()));
            }
        }

        tracing::debug!(
            workflow_id = %definition.id,
            version = definition.version,
            steps = definition.step_count(),
            transitions = definition.transition_count(),
            "Workflow definition validated"
        );
        Ok(())
    }
}

/// Validate a definition with the default [`Validator`]
pub fn validate(definition: &WorkflowDefinition) -> WorkflowResult<()> {
    Validator.validate(definition)
}

/// Adjacency lists built in one pass over the transitions.
///
/// Parallel edges between the same pair of steps are kept; in-degrees
/// count every edge so Kahn's algorithm stays consistent.
struct Adjacency<'a> {
    nodes: Vec<&'a str>,
    outgoing: HashMap<&'a str, Vec<&'a str>>,
    incoming_count: HashMap<&'a str, usize>,
}

impl<'a> Adjacency<'a> {
    fn build(definition: &'a WorkflowDefinition, ids: &HashSet<&'a str>) -> Self {
        let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::with_capacity(ids.len());
        let mut incoming_count: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
        for id in ids {
            outgoing.entry(*id).or_default();
            incoming_count.entry(*id).or_insert(0);
        }
        for transition in &definition.transitions {
            outgoing
                .entry(transition.source.as_str())
                .or_default()
                .push(transition.target.as_str());
            *incoming_count
                .entry(transition.target.as_str())
                .or_insert(0) += 1;
        }
        let nodes = definition.steps.iter().map(|s| s.id.as_str()).collect();
        Self {
            nodes,
            outgoing,
            incoming_count,
        }
    }

    fn downstream(&self, id: &str) -> &[&'a str] {
        self.outgoing.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn in_degree(&self, id: &str) -> usize {
        self.incoming_count.get(id).copied().unwrap_or(0)
    }

    /// Breadth-first traversal over outgoing edges
    fn reachable_from(&self, start: &'a str) -> HashSet<&'a str> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            for next in self.downstream(current) {
                if !seen.contains(next) {
                    queue.push_back(*next);
                }
            }
        }
        seen
    }

    /// Kahn's algorithm: a cycle exists if not every node can be removed
    fn has_cycle(&self) -> bool {
        let mut in_degree = self.incoming_count.clone();
        let mut queue: VecDeque<&str> = self
            .nodes
            .iter()
            .copied()
            .filter(|id| in_degree.get(id).copied().unwrap_or(0) == 0)
            .collect();
        let mut removed = 0usize;
        while let Some(current) = queue.pop_front() {
            removed += 1;
            for next in self.downstream(current) {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*next);
                    }
                }
            }
        }
        removed < self.nodes.len()
    }
}
