//! `routeflow check-access`: may an actor enter a step?

use super::Document;
use crate::error::{CliError, CliResult};
use crate::output::{print_json, print_success, OutputFormat};
use routeflow_engine::{can_transition, validate};
use routeflow_types::{StepId, WorkflowError};
use serde_json::json;
use std::path::Path;

/// Denied access is reported as an error so the exit status reflects it.
pub fn execute(
    file: &Path,
    step_id: &str,
    roles: &[String],
    permissions: &[String],
    format: OutputFormat,
) -> CliResult<()> {
    let definition = Document::load(file)?.into_definition()?;
    validate(&definition)?;
    let step = definition
        .get_step(step_id)
        .ok_or_else(|| WorkflowError::StepNotFound(StepId::new(step_id)))?;

    let allowed = can_transition(step, roles, permissions);
    tracing::debug!(workflow_id = %definition.id, step_id, allowed, "Checked access");

    match format {
        OutputFormat::Text if allowed => {
            print_success(&format!("Access granted to step '{}'", step_id))
        }
        OutputFormat::Text => {}
        OutputFormat::Json => print_json(&json!({ "step": step_id, "allowed": allowed }))?,
    }

    if allowed {
        Ok(())
    } else {
        Err(CliError::AccessDenied(step_id.to_string()))
    }
}
