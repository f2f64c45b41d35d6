//! Workflow definitions: the static graph of a business process
//!
//! A WorkflowDefinition is a directed graph where:
//! - Nodes are steps (start, task, gateway, end)
//! - Edges are transitions, optionally condition-gated
//!
//! Definitions are immutable once validated. To modify, create a new version.

use crate::Transition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque key/value metadata carried on steps and definitions.
///
/// Never interpreted by the engine.
pub type Meta = BTreeMap<String, Value>;

// ── Identifiers ──────────────────────────────────────────────────────

/// Identifier of a workflow definition (shared by all of its versions)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a step, unique within one definition
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for StepId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// ── Workflow Definition ──────────────────────────────────────────────

/// A workflow definition: the routing graph for one version of a process
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Identifier shared across versions
    pub id: WorkflowId,
    /// Human-readable name
    pub name: String,
    /// Version, starting at 1. Bumped by the store, never by the engine.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Steps, in declaration order
    pub steps: Vec<Step>,
    /// Transitions, in declaration order
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: Meta,
}

fn default_version() -> u32 {
    1
}

impl WorkflowDefinition {
    /// Create an empty definition at version 1
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: WorkflowId::new(id),
            name: name.into(),
            version: 1,
            steps: Vec::new(),
            transitions: Vec::new(),
            meta: Meta::new(),
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Append a step. No uniqueness check is made here.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a transition. Endpoints are not checked here.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// The `(id, version)` pair this definition is stored under
    pub fn key(&self) -> (WorkflowId, u32) {
        (self.id.clone(), self.version)
    }

    /// Get a step by ID (first match in declaration order)
    pub fn get_step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id.as_str() == id)
    }

    /// All steps of kind START
    pub fn start_steps(&self) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::Start)
            .collect()
    }

    /// All steps of kind END
    pub fn end_steps(&self) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::End)
            .collect()
    }

    /// Outgoing transitions from a step, in declaration order
    pub fn outgoing<'a>(&'a self, step_id: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions
            .iter()
            .filter(move |t| t.source.as_str() == step_id)
    }

    /// Incoming transitions to a step, in declaration order
    pub fn incoming<'a>(&'a self, step_id: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions
            .iter()
            .filter(move |t| t.target.as_str() == step_id)
    }

    /// Total number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Total number of transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

// ── Step ─────────────────────────────────────────────────────────────

/// A node in the workflow graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier within this workflow
    pub id: StepId,
    /// Human-readable name
    pub name: String,
    /// Step kind
    #[serde(default)]
    pub kind: StepKind,
    /// Roles allowed to move into this step (compared case-insensitively)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignee_roles: Vec<String>,
    /// Permissions that grant entry into this step (wildcards allowed on the grant side)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    /// Metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: Meta,
}

impl Step {
    /// Create a new step
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: StepId::new(id),
            name: name.into(),
            kind,
            assignee_roles: Vec::new(),
            permissions: Vec::new(),
            meta: Meta::new(),
        }
    }

    /// Create a start step
    pub fn start(id: impl Into<String>) -> Self {
        Self::new(id, "Start", StepKind::Start)
    }

    /// Create an end step
    pub fn end(id: impl Into<String>) -> Self {
        Self::new(id, "End", StepKind::End)
    }

    /// Create a task step
    pub fn task(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, StepKind::Task)
    }

    /// Create a gateway step
    pub fn gateway(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, StepKind::Gateway)
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignee_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// A step with neither roles nor permissions is open to everyone
    pub fn is_open(&self) -> bool {
        self.assignee_roles.is_empty() && self.permissions.is_empty()
    }
}

// ── Step Kind ────────────────────────────────────────────────────────

/// The kind of a workflow step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// The single entry point of the workflow
    Start,
    /// Ordinary unit of work
    #[default]
    Task,
    /// Conditional branch or parallel fork/join point
    Gateway,
    /// A terminal step
    End,
}

impl StepKind {
    /// Map free-form text onto a kind, case-insensitively.
    ///
    /// Unknown or empty text falls back to [`StepKind::Task`].
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "gateway" => Self::Gateway,
            "end" => Self::End,
            _ => Self::Task,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Task => "task",
            Self::Gateway => "gateway",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_simple_workflow() -> WorkflowDefinition {
        WorkflowDefinition::new("doc.review", "Document Review")
            .with_step(Step::start("start"))
            .with_step(
                Step::task("review", "Review Document")
                    .with_roles(["reviewer"])
                    .with_permissions(["doc.review"]),
            )
            .with_step(Step::end("end"))
            .with_transition(Transition::new("start", "review"))
            .with_transition(Transition::new("review", "end"))
    }

    #[test]
    fn test_create_workflow_definition() {
        let wf = make_simple_workflow();

        assert_eq!(wf.name, "Document Review");
        assert_eq!(wf.version, 1);
        assert_eq!(wf.step_count(), 3);
        assert_eq!(wf.transition_count(), 2);
        assert_eq!(wf.start_steps().len(), 1);
        assert_eq!(wf.end_steps().len(), 1);
        assert_eq!(wf.key(), (WorkflowId::new("doc.review"), 1));
    }

    #[test]
    fn test_builders_do_not_validate() {
        // Duplicate ids and dangling edges are accepted at construction time
        let wf = WorkflowDefinition::new("bad", "Bad")
            .with_step(Step::start("a"))
            .with_step(Step::task("a", "Again"))
            .with_transition(Transition::new("a", "nowhere"));
        assert_eq!(wf.step_count(), 2);
        assert_eq!(wf.transition_count(), 1);
    }

    #[test]
    fn test_outgoing_incoming() {
        let wf = make_simple_workflow();

        let out: Vec<_> = wf.outgoing("start").collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target, StepId::new("review"));

        let inc: Vec<_> = wf.incoming("end").collect();
        assert_eq!(inc.len(), 1);
        assert_eq!(inc[0].source, StepId::new("review"));

        assert_eq!(wf.incoming("start").count(), 0);
    }

    #[test]
    fn test_step_kind_parse_lenient() {
        assert_eq!(StepKind::parse_lenient("START"), StepKind::Start);
        assert_eq!(StepKind::parse_lenient(" Gateway "), StepKind::Gateway);
        assert_eq!(StepKind::parse_lenient("end"), StepKind::End);
        assert_eq!(StepKind::parse_lenient("task"), StepKind::Task);
        assert_eq!(StepKind::parse_lenient("subprocess"), StepKind::Task);
        assert_eq!(StepKind::parse_lenient(""), StepKind::Task);
    }

    #[test]
    fn test_step_open() {
        assert!(Step::task("t", "T").is_open());
        assert!(!Step::task("t", "T").with_roles(["user"]).is_open());
        assert!(!Step::task("t", "T").with_permissions(["x.y"]).is_open());
    }

    #[test]
    fn test_serde_shape() {
        let wf = make_simple_workflow().with_meta("owner", "ops");
        let json = serde_json::to_value(&wf).unwrap();

        assert_eq!(json["id"], "doc.review");
        assert_eq!(json["steps"][0]["kind"], "start");
        assert_eq!(json["steps"][1]["assignee_roles"][0], "reviewer");
        assert_eq!(json["meta"]["owner"], "ops");

        let back: WorkflowDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, wf);
    }

    #[test]
    fn test_deserialize_defaults() {
        let wf: WorkflowDefinition = serde_json::from_str(
            r#"{"id": "w", "name": "W", "steps": [{"id": "s", "name": "S"}]}"#,
        )
        .unwrap();
        assert_eq!(wf.version, 1);
        assert_eq!(wf.steps[0].kind, StepKind::Task);
        assert!(wf.transitions.is_empty());
        assert!(wf.meta.is_empty());
    }
}
