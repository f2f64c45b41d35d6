//! Compiler: converts a parsed blueprint into a WorkflowDefinition
//!
//! Compilation is purely structural translation. It never checks graph
//! invariants; run the output through the validator (or use
//! [`compile_and_validate`]) before routing against it.

use crate::blueprint::Blueprint;
use crate::errors::BlueprintResult;
use crate::parser::{ParsedBlueprint, ParsedEdge, ParsedNode, Parser};
use routeflow_engine::Validator;
use routeflow_types::{Step, Transition, WorkflowDefinition};

/// `meta.source` value stamped on every compiled definition
pub const BLUEPRINT_SOURCE: &str = "blueprint";

/// Compiles parsed blueprints into workflow definitions
pub struct Compiler;

impl Compiler {
    pub fn compile(parsed: ParsedBlueprint) -> WorkflowDefinition {
        let mut definition = WorkflowDefinition::new(parsed.key.clone(), parsed.title)
            .with_version(parsed.version)
            .with_meta("source", BLUEPRINT_SOURCE)
            .with_meta("blueprint_key", parsed.key)
            .with_meta("blueprint_version", parsed.version);

        for node in parsed.nodes {
            definition = definition.with_step(Self::compile_node(node));
        }
        for edge in parsed.edges {
            definition = definition.with_transition(Self::compile_edge(edge));
        }
        definition
    }

    fn compile_node(node: ParsedNode) -> Step {
        let mut step = Step::new(node.id, node.name, node.kind)
            .with_roles(node.roles)
            .with_permissions(node.permissions);
        step.meta = node.meta;
        step
    }

    fn compile_edge(edge: ParsedEdge) -> Transition {
        let mut transition = Transition::new(edge.source, edge.target);
        transition.name = edge.name;
        transition.condition = edge.condition;
        transition.is_parallel_fork = edge.fork;
        transition.is_parallel_join = edge.join;
        transition
    }
}

/// Compile a designer blueprint into a workflow definition.
///
/// Fails on the first node without an id or edge without an endpoint;
/// no partial definition is returned.
pub fn compile_to_workflow(blueprint: &Blueprint) -> BlueprintResult<WorkflowDefinition> {
    let parsed = Parser::parse(blueprint)?;
    let definition = Compiler::compile(parsed);
    tracing::debug!(
        blueprint_key = %blueprint.key,
        version = blueprint.version,
        steps = definition.step_count(),
        transitions = definition.transition_count(),
        "Blueprint compiled"
    );
    Ok(definition)
}

/// Compile and run the structural validator on the result
pub fn compile_and_validate(blueprint: &Blueprint) -> BlueprintResult<WorkflowDefinition> {
    let definition = compile_to_workflow(blueprint)?;
    Validator::new().validate(&definition)?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::RawElement;
    use crate::errors::BlueprintError;
    use routeflow_types::{Condition, StepKind, WorkflowError};
    use serde_json::{json, Value};

    fn element(value: Value) -> RawElement {
        value.as_object().cloned().unwrap_or_default()
    }

    fn approval_blueprint() -> Blueprint {
        Blueprint::new("expense", "Expense approval")
            .with_version(3)
            .with_node(element(json!({ "id": "start", "type": "start" })))
            .with_node(element(json!({
                "key": "review",
                "title": "Manager review",
                "kind": "gateway",
                "roles": ["manager"]
            })))
            .with_node(element(json!({
                "id": "pay",
                "name": "Pay out",
                "perms": ["finance.*"],
                "meta": { "sla_hours": 24 }
            })))
            .with_node(element(json!({ "id": "end", "type": "end" })))
            .with_edge(element(json!({ "source": "start", "target": "review" })))
            .with_edge(element(json!({
                "from": "review",
                "to": "pay",
                "name": "approved",
                "condition": "{\"var\": \"approved\"}"
            })))
            .with_edge(element(json!({ "source": "pay", "target": "end" })))
    }

    #[test]
    fn test_compile_maps_nodes_and_edges() {
        let wf = compile_to_workflow(&approval_blueprint()).unwrap();

        assert_eq!(wf.id.as_str(), "expense");
        assert_eq!(wf.name, "Expense approval");
        assert_eq!(wf.version, 3);
        assert_eq!(wf.step_count(), 4);
        assert_eq!(wf.transition_count(), 3);

        let review = wf.get_step("review").unwrap();
        assert_eq!(review.name, "Manager review");
        assert_eq!(review.kind, StepKind::Gateway);
        assert_eq!(review.assignee_roles, vec!["manager"]);

        let pay = wf.get_step("pay").unwrap();
        assert_eq!(pay.kind, StepKind::Task);
        assert_eq!(pay.permissions, vec!["finance.*"]);
        assert_eq!(pay.meta.get("sla_hours"), Some(&json!(24)));

        let approved = &wf.transitions[1];
        assert_eq!(approved.name.as_deref(), Some("approved"));
        assert_eq!(
            approved.condition,
            Some(Condition::new("{\"var\": \"approved\"}"))
        );
    }

    #[test]
    fn test_compile_stamps_provenance() {
        let wf = compile_to_workflow(&approval_blueprint()).unwrap();
        assert_eq!(wf.meta.get("source"), Some(&json!("blueprint")));
        assert_eq!(wf.meta.get("blueprint_key"), Some(&json!("expense")));
        assert_eq!(wf.meta.get("blueprint_version"), Some(&json!(3)));
    }

    #[test]
    fn test_compile_blank_title_uses_key() {
        let wf = compile_to_workflow(&Blueprint::new("bare", "  ")).unwrap();
        assert_eq!(wf.name, "bare");
        assert_eq!(wf.step_count(), 0);
    }

    #[test]
    fn test_compile_does_not_validate() {
        // No END step, yet compilation succeeds
        let bp = Blueprint::new("partial", "Partial")
            .with_node(element(json!({ "id": "start", "type": "start" })));
        assert!(compile_to_workflow(&bp).is_ok());
        assert_eq!(
            compile_and_validate(&bp).unwrap_err(),
            BlueprintError::Workflow(WorkflowError::NoEndStep)
        );
    }

    #[test]
    fn test_compile_and_validate_accepts_valid() {
        let wf = compile_and_validate(&approval_blueprint()).unwrap();
        assert_eq!(wf.start_steps().len(), 1);
    }

    #[test]
    fn test_compile_fails_without_partial_result() {
        let bp = approval_blueprint().with_edge(element(json!({ "source": "end" })));
        assert_eq!(
            compile_to_workflow(&bp).unwrap_err(),
            BlueprintError::MissingEdgeEndpoint {
                index: 3,
                field: "target"
            }
        );
    }
}
