//! Transition evaluator: which steps can follow the current one
//!
//! The evaluator is stateless per call. It walks the definition's
//! transitions in declaration order, keeps those leaving the current
//! step, and asks a [`ConditionEvaluator`] about each guard.
//!
//! Condition evaluation is a suspension point. Implementations may
//! consult external rule services, so the call is async even when the
//! answer is trivially known.

use async_trait::async_trait;
use routeflow_types::{Condition, Step, WorkflowDefinition};
use serde_json::{Map, Value};

/// Runtime variables a condition is evaluated against
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationContext {
    pub variables: Map<String, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<Map<String, Value>> for EvaluationContext {
    fn from(variables: Map<String, Value>) -> Self {
        Self { variables }
    }
}

/// Capability that decides whether a transition guard holds.
#[async_trait]
pub trait ConditionEvaluator: Send + Sync {
    async fn evaluate(&self, condition: &Condition, context: &EvaluationContext) -> bool;
}

/// Accepts every condition.
///
/// Still yields to the scheduler once per call, so callers never rely
/// on condition evaluation completing without a suspension.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysTrue;

#[async_trait]
impl ConditionEvaluator for AlwaysTrue {
    async fn evaluate(&self, _condition: &Condition, _context: &EvaluationContext) -> bool {
        tokio::task::yield_now().await;
        true
    }
}

/// Computes the legal next steps for a step in a validated definition
#[derive(Clone, Debug, Default)]
pub struct TransitionEvaluator<C = AlwaysTrue> {
    conditions: C,
}

impl TransitionEvaluator<AlwaysTrue> {
    pub fn new() -> Self {
        Self {
            conditions: AlwaysTrue,
        }
    }
}

impl<C: ConditionEvaluator> TransitionEvaluator<C> {
    /// Use a specific condition evaluator
    pub fn with_conditions(conditions: C) -> Self {
        Self { conditions }
    }

    pub fn conditions(&self) -> &C {
        &self.conditions
    }

    /// Target steps of every transition leaving `current_step_id` whose
    /// condition holds, in transition declaration order.
    ///
    /// An unknown `current_step_id` yields an empty list.
    pub async fn next_steps(
        &self,
        definition: &WorkflowDefinition,
        current_step_id: &str,
        context: &EvaluationContext,
    ) -> Vec<Step> {
        let mut targets = Vec::new();
        for transition in definition.outgoing(current_step_id) {
            let open = match &transition.condition {
                None => true,
                Some(condition) => self.conditions.evaluate(condition, context).await,
            };
            if !open {
                continue;
            }
            match definition.get_step(transition.target.as_str()) {
                Some(step) => targets.push(step.clone()),
                None => tracing::warn!(
                    workflow_id = %definition.id,
                    source = %transition.source,
                    target = %transition.target,
                    "Skipping transition to unknown step"
                ),
            }
        }

        tracing::debug!(
            workflow_id = %definition.id,
            step_id = current_step_id,
            next = targets.len(),
            "Evaluated next steps"
        );
        targets
    }
}
