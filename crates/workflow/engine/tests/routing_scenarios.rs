//! End-to-end routing scenarios and validator soundness properties.

use proptest::prelude::*;
use routeflow_engine::*;
use routeflow_types::*;

const NONE: [&str; 0] = [];

fn triage_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new("it.incident", "IT Incident")
        .with_step(Step::start("start"))
        .with_step(Step::gateway("triage", "Triage"))
        .with_step(
            Step::task("do_task", "Do Task")
                .with_roles(["user"])
                .with_permissions(["task.update"]),
        )
        .with_step(Step::end("end"))
        .with_transition(Transition::new("start", "triage"))
        .with_transition(Transition::conditional(
            "triage",
            "do_task",
            Condition::new("{\"==\": [true, true]}"),
        ))
        .with_transition(Transition::new("do_task", "end"))
}

#[tokio::test]
async fn test_triage_scenario() {
    let wf = triage_workflow();
    validate(&wf).expect("scenario workflow is valid");

    let next = TransitionEvaluator::new()
        .next_steps(&wf, "triage", &EvaluationContext::new())
        .await;
    assert_eq!(next.len(), 1);
    let do_task = &next[0];
    assert_eq!(do_task.id.as_str(), "do_task");

    assert!(can_transition(do_task, ["user"], NONE));
    assert!(can_transition(do_task, ["viewer"], ["task.update"]));
    assert!(!can_transition(do_task, ["viewer"], ["task.read"]));
}

#[tokio::test]
async fn test_service_routes_latest_version() {
    let v1 = triage_workflow();
    let v2 = triage_workflow()
        .with_version(2)
        .with_step(Step::task("escalate", "Escalate").with_roles(["oncall"]))
        .with_transition(Transition::new("triage", "escalate"))
        .with_transition(Transition::new("escalate", "end"));

    let service = WorkflowService::new(InMemoryWorkflowStore::new());
    service.publish(v1).await.unwrap();
    service.publish(v2).await.unwrap();

    let id = WorkflowId::new("it.incident");
    let ctx = EvaluationContext::new();

    let next = service
        .allowed_next_steps(&id, "triage", &ctx, &["user", "oncall"], &NONE)
        .await
        .unwrap();
    let ids: Vec<_> = next.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["do_task", "escalate"]);

    let pinned = service.get_definition(&id, Some(1)).await.unwrap();
    let next = service
        .permitted_next_steps(&pinned, "triage", &ctx, &["oncall"], &NONE)
        .await;
    assert!(next.is_empty());
}

#[tokio::test]
async fn test_evaluation_is_cancellable() {
    // Dropping an in-flight evaluation leaves nothing behind
    let wf = triage_workflow();
    let evaluator = TransitionEvaluator::new();
    let ctx = EvaluationContext::new();
    {
        let pending = evaluator.next_steps(&wf, "triage", &ctx);
        drop(pending);
    }
    let next = evaluator.next_steps(&wf, "triage", &ctx).await;
    assert_eq!(next.len(), 1);
}

/// A random layered DAG: START -> layers of tasks/gateways -> END.
///
/// Every middle step has an edge from some step in the previous layer and
/// an edge to some step in the next, so the graph is connected, acyclic
/// and satisfies the START/END degree rules by construction.
fn layered_workflow(layers: Vec<Vec<bool>>, extra: Vec<(usize, usize)>) -> WorkflowDefinition {
    let mut wf = WorkflowDefinition::new("prop", "Property").with_step(Step::start("start"));
    let mut ordered: Vec<Vec<String>> = vec![vec!["start".to_string()]];

    for (depth, layer) in layers.iter().enumerate() {
        let mut names = Vec::new();
        for (index, gateway) in layer.iter().enumerate() {
            let id = format!("s{}_{}", depth, index);
            let step = if *gateway {
                Step::gateway(id.clone(), "Gateway")
            } else {
                Step::task(id.clone(), "Task")
            };
            wf = wf.with_step(step);
            names.push(id);
        }
        ordered.push(names);
    }
    wf = wf.with_step(Step::end("end"));
    ordered.push(vec!["end".to_string()]);

    for pair in ordered.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        for (i, target) in next.iter().enumerate() {
            wf = wf.with_transition(Transition::new(prev[i % prev.len()].clone(), target.clone()));
        }
        for (i, source) in prev.iter().enumerate() {
            wf = wf.with_transition(Transition::new(source.clone(), next[i % next.len()].clone()));
        }
    }

    // Forward-only shortcuts never create cycles; END is never a source
    let flat: Vec<&String> = ordered.iter().flatten().collect();
    for (a, b) in extra {
        let (from, to) = (a % (flat.len() - 1), b % flat.len());
        if from < to {
            wf = wf.with_transition(Transition::new(flat[from].clone(), flat[to].clone()));
        }
    }
    wf
}

proptest! {
    #[test]
    fn property_layered_dags_validate(
        layers in prop::collection::vec(prop::collection::vec(any::<bool>(), 1..4), 0..5),
        extra in prop::collection::vec((0usize..32, 0usize..32), 0..6),
    ) {
        let wf = layered_workflow(layers, extra);
        prop_assert_eq!(validate(&wf), Ok(()));
    }

    #[test]
    fn property_back_edge_is_rejected(
        layers in prop::collection::vec(prop::collection::vec(any::<bool>(), 1..4), 2..5),
    ) {
        // s0_0 always feeds s1_0, so pointing s1_0 back closes a cycle
        let wf = layered_workflow(layers, Vec::new())
            .with_transition(Transition::new("s1_0", "s0_0"));
        prop_assert_eq!(validate(&wf), Err(WorkflowError::CycleDetected));
    }
}
