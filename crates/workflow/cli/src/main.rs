//! Routeflow CLI - validate, compile and route workflow definitions
//!
//! Works on JSON files holding either a workflow definition or a
//! designer blueprint (recognised by its top-level `nodes`):
//! - Validate the workflow graph
//! - Compile blueprints into definitions
//! - List the next steps an actor may move into
//! - Check access to a single step

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{access, compile, route, validate};
use config::CliConfig;
use error::CliResult;
use output::OutputFormat;

/// Routeflow CLI application
#[derive(Parser)]
#[command(name = "routeflow")]
#[command(about = "Routeflow - workflow validation, routing and access checks", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ROUTEFLOW_CONFIG")]
    config: Option<String>,

    /// Output format (text, json); overrides the configured default
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Check a definition (or blueprint) against the graph invariants
    Validate {
        /// Definition or blueprint JSON file
        file: PathBuf,
    },

    /// Compile a blueprint and print the workflow definition
    Compile {
        /// Blueprint JSON file
        file: PathBuf,

        /// Skip structural validation of the compiled definition
        #[arg(long)]
        no_validate: bool,
    },

    /// List the next steps the actor may move into
    Route {
        /// Definition or blueprint JSON file
        file: PathBuf,

        /// Current step id
        #[arg(long)]
        from: String,

        /// Evaluation context as a JSON object
        #[arg(long)]
        context: Option<String>,

        /// Actor role (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Granted permission (repeatable, wildcards allowed)
        #[arg(long = "perm")]
        perms: Vec<String>,
    },

    /// Check whether the actor may enter a step
    #[command(alias = "access")]
    CheckAccess {
        /// Definition or blueprint JSON file
        file: PathBuf,

        /// Step id
        #[arg(long)]
        step: String,

        /// Actor role (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Granted permission (repeatable, wildcards allowed)
        #[arg(long = "perm")]
        perms: Vec<String>,
    },

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;

    // Initialize tracing; logs go to stderr so JSON output stays clean
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_filter.clone().unwrap_or_else(|| "info".to_string())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let format = cli.output.unwrap_or(config.output);

    // Execute command
    match cli.command {
        Commands::Validate { file } => validate::execute(&file, format),
        Commands::Compile { file, no_validate } => compile::execute(&file, no_validate),
        Commands::Route {
            file,
            from,
            context,
            roles,
            perms,
        } => {
            let request = route::RouteRequest {
                file: &file,
                from: &from,
                context: context.as_deref(),
                roles: config.roles_or_default(roles),
                permissions: config.permissions_or_default(perms),
            };
            route::execute(request, format).await
        }
        Commands::CheckAccess {
            file,
            step,
            roles,
            perms,
        } => access::execute(
            &file,
            &step,
            &config.roles_or_default(roles),
            &config.permissions_or_default(perms),
            format,
        ),
        Commands::Config => {
            println!("Output: {:?}", format);
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
