//! `routeflow compile`: blueprint in, workflow definition JSON out

use super::Document;
use crate::error::{CliError, CliResult};
use crate::output::print_json;
use routeflow_blueprint::{compile_and_validate, compile_to_workflow};
use std::path::Path;

/// The compiled definition is always printed as JSON.
pub fn execute(file: &Path, no_validate: bool) -> CliResult<()> {
    let blueprint = match Document::load(file)? {
        Document::Blueprint(blueprint) => blueprint,
        Document::Definition(_) => {
            return Err(CliError::InvalidInput(format!(
                "{} holds a workflow definition, not a blueprint",
                file.display()
            )))
        }
    };

    let definition = if no_validate {
        compile_to_workflow(&blueprint)?
    } else {
        compile_and_validate(&blueprint)?
    };
    tracing::info!(
        blueprint_key = %blueprint.key,
        version = definition.version,
        validated = !no_validate,
        "Compiled blueprint"
    );
    print_json(&definition)
}
