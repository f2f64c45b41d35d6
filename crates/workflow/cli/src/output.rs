//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use routeflow_types::Step;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text and tables
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Table row for step display
#[derive(Debug, Tabled)]
pub struct StepRow {
    id: String,
    name: String,
    kind: String,
    roles: String,
    permissions: String,
}

impl From<&Step> for StepRow {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id.to_string(),
            name: step.name.clone(),
            kind: step.kind.to_string(),
            roles: dash_if_empty(&step.assignee_roles),
            permissions: dash_if_empty(&step.permissions),
        }
    }
}

fn dash_if_empty(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

/// Print steps as a table or a JSON array
pub fn print_steps(steps: &[Step], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            if steps.is_empty() {
                println!("{}", "No permitted next steps".dimmed());
            } else {
                let table = Table::new(steps.iter().map(StepRow::from)).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => print_json(&steps)?,
    }
    Ok(())
}

/// Pretty-print a value as JSON
pub fn print_json<T: Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}
