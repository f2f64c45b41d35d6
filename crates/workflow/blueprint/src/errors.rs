//! Blueprint error types

use routeflow_types::WorkflowError;

/// Errors that can occur while parsing, compiling or storing blueprints
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlueprintError {
    #[error("Blueprint node #{index} is missing required 'id' (or 'key')")]
    MissingNodeId { index: usize },

    #[error("Blueprint edge #{index} requires '{field}' ({})", endpoint_alias(.field))]
    MissingEdgeEndpoint { index: usize, field: &'static str },

    #[error("Blueprint edge #{index} has unknown condition kind '{kind}'")]
    InvalidConditionKind { index: usize, kind: String },

    #[error("Blueprint '{key}' is at version {version} and cannot be bumped further")]
    VersionOverflow { key: String, version: u32 },

    #[error("Blueprint not found: {0}")]
    NotFound(String),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

fn endpoint_alias(field: &str) -> &'static str {
    match field {
        "source" => "or 'from'",
        _ => "or 'to'",
    }
}

/// Result type alias for blueprint operations
pub type BlueprintResult<T> = Result<T, BlueprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_aliases() {
        let err = BlueprintError::MissingEdgeEndpoint {
            index: 2,
            field: "target",
        };
        assert_eq!(err.to_string(), "Blueprint edge #2 requires 'target' (or 'to')");

        let err = BlueprintError::MissingNodeId { index: 0 };
        assert!(err.to_string().contains("'key'"));
    }

    #[test]
    fn test_workflow_error_converts() {
        let err: BlueprintError = WorkflowError::CycleDetected.into();
        assert_eq!(err, BlueprintError::Workflow(WorkflowError::CycleDetected));
    }
}
