//! CLI command implementations

pub mod access;
pub mod compile;
pub mod route;
pub mod validate;

use crate::error::{CliError, CliResult};
use routeflow_blueprint::{compile_to_workflow, Blueprint};
use routeflow_types::WorkflowDefinition;
use serde_json::Value;
use std::path::Path;

/// A workflow input file, as found on disk
pub enum Document {
    Blueprint(Blueprint),
    Definition(WorkflowDefinition),
}

impl Document {
    /// Read a JSON file holding either a blueprint or a definition
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> CliResult<Self> {
        if !value.is_object() {
            return Err(CliError::InvalidInput(
                "expected a JSON object with `nodes` or `steps`".into(),
            ));
        }
        if Blueprint::is_blueprint_document(&value) {
            Ok(Self::Blueprint(serde_json::from_value(value)?))
        } else {
            Ok(Self::Definition(serde_json::from_value(value)?))
        }
    }

    /// Compile if needed; structural validation is left to the caller
    pub fn into_definition(self) -> CliResult<WorkflowDefinition> {
        match self {
            Self::Blueprint(blueprint) => Ok(compile_to_workflow(&blueprint)?),
            Self::Definition(definition) => Ok(definition),
        }
    }
}
