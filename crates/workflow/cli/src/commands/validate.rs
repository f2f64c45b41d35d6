//! `routeflow validate`: structural checks on a definition or blueprint

use super::Document;
use crate::error::CliResult;
use crate::output::{print_json, print_success, OutputFormat};
use routeflow_engine::validate;
use serde_json::json;
use std::path::Path;

pub fn execute(file: &Path, format: OutputFormat) -> CliResult<()> {
    let definition = Document::load(file)?.into_definition()?;
    validate(&definition)?;

    match format {
        OutputFormat::Text => print_success(&format!(
            "Workflow '{}' v{} is valid ({} steps, {} transitions)",
            definition.id,
            definition.version,
            definition.step_count(),
            definition.transition_count()
        )),
        OutputFormat::Json => print_json(&json!({
            "id": definition.id,
            "version": definition.version,
            "valid": true,
        }))?,
    }
    Ok(())
}
