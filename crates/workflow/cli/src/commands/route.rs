//! `routeflow route`: permitted next steps from a given step

use super::Document;
use crate::error::{CliError, CliResult};
use crate::output::{print_steps, OutputFormat};
use routeflow_engine::{validate, EvaluationContext, InMemoryWorkflowStore, WorkflowService};
use routeflow_types::{StepId, WorkflowError};
use serde_json::Value;
use std::path::Path;

pub struct RouteRequest<'a> {
    pub file: &'a Path,
    pub from: &'a str,
    pub context: Option<&'a str>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

pub async fn execute(request: RouteRequest<'_>, format: OutputFormat) -> CliResult<()> {
    let definition = Document::load(request.file)?.into_definition()?;
    validate(&definition)?;
    if definition.get_step(request.from).is_none() {
        return Err(WorkflowError::StepNotFound(StepId::new(request.from)).into());
    }
    let context = parse_context(request.context)?;

    let id = definition.id.clone();
    let service = WorkflowService::new(InMemoryWorkflowStore::with_definitions([definition]));
    let next = service
        .allowed_next_steps(
            &id,
            request.from,
            &context,
            request.roles.as_slice(),
            request.permissions.as_slice(),
        )
        .await?;

    tracing::debug!(workflow_id = %id, step_id = request.from, next = next.len(), "Routed");
    print_steps(&next, format)
}

/// Parse `--context` as a JSON object; absent means empty.
fn parse_context(raw: Option<&str>) -> CliResult<EvaluationContext> {
    match raw {
        None => Ok(EvaluationContext::new()),
        Some(text) => match serde_json::from_str::<Value>(text)? {
            Value::Object(variables) => Ok(EvaluationContext::from(variables)),
            _ => Err(CliError::InvalidInput("--context must be a JSON object".into())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context() {
        assert!(parse_context(None).unwrap().is_empty());

        let ctx = parse_context(Some(r#"{"priority": 2}"#)).unwrap();
        assert_eq!(ctx.get("priority"), Some(&Value::from(2)));

        assert!(matches!(
            parse_context(Some("[1]")),
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(parse_context(Some("{")), Err(CliError::Json(_))));
    }
}
