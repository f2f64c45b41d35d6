//! Error types for the Workflow layer

use crate::{StepId, WorkflowId};

/// Errors that can occur in Workflow operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Workflow definition not found: {}", describe_key(.id, .version))]
    DefinitionNotFound {
        id: WorkflowId,
        version: Option<u32>,
    },

    #[error("Step not found: {0}")]
    StepNotFound(StepId),

    #[error("Duplicate step id: {0}")]
    DuplicateStepId(StepId),

    #[error("Workflow must have exactly one START step, found none")]
    NoStartStep,

    #[error("Workflow must have exactly one START step, found {count}: {}", join_ids(.ids))]
    MultipleStartSteps { count: usize, ids: Vec<StepId> },

    #[error("Workflow must have at least one END step")]
    NoEndStep,

    #[error("Transition references unknown step: {source_id} -> {target_id}")]
    DanglingTransition { source_id: StepId, target_id: StepId },

    #[error("START step '{0}' must not have incoming transitions")]
    StartHasIncoming(StepId),

    #[error("END step '{0}' must not have outgoing transitions")]
    EndHasOutgoing(StepId),

    #[error("Unreachable steps from START: {}", join_ids(.0))]
    UnreachableSteps(Vec<StepId>),

    #[error("Workflow graph contains a cycle")]
    CycleDetected,

    #[error("Parallel fork transition must originate from a GATEWAY: {0}")]
    MisplacedFork(StepId),

    #[error("Parallel join transition must target a GATEWAY: {0}")]
    MisplacedJoin(StepId),
}

impl WorkflowError {
    /// Whether this error comes from the structural validator (as opposed
    /// to a store lookup).
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::DefinitionNotFound { .. } | Self::StepNotFound(_)
        )
    }
}

fn describe_key(id: &WorkflowId, version: &Option<u32>) -> String {
    match version {
        Some(v) => format!("{}@{}", id, v),
        None => id.to_string(),
    }
}

fn join_ids(ids: &[StepId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_version() {
        let err = WorkflowError::DefinitionNotFound {
            id: WorkflowId::new("it.incident"),
            version: Some(3),
        };
        assert_eq!(
            err.to_string(),
            "Workflow definition not found: it.incident@3"
        );

        let err = WorkflowError::DefinitionNotFound {
            id: WorkflowId::new("it.incident"),
            version: None,
        };
        assert_eq!(err.to_string(), "Workflow definition not found: it.incident");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_unreachable_lists_ids() {
        let err = WorkflowError::UnreachableSteps(vec![StepId::new("a"), StepId::new("b")]);
        assert_eq!(err.to_string(), "Unreachable steps from START: a, b");
        assert!(err.is_validation());
    }
}
