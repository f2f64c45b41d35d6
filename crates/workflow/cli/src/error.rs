//! CLI error types

use routeflow_blueprint::BlueprintError;
use routeflow_types::WorkflowError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The actor may not enter the requested step
    #[error("Access denied to step '{0}'")]
    AccessDenied(String),

    /// Structural or lookup failure from the engine
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// Blueprint compilation failure
    #[error("{0}")]
    Blueprint(#[from] BlueprintError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
