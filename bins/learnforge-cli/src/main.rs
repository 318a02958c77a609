mod commands;
mod generator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use learnforge_contracts::guards::Schema;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "learnforge-cli")]
#[command(about = "Learnforge CLI - Check payloads against the shared contracts", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a JSON payload against the shape validators
    Check {
        /// Schema to check against (exercise, test-result, api-response,
        /// code-execution-result). Without it, every matching schema is listed.
        #[arg(short, long)]
        schema: Option<Schema>,

        /// Payload file; reads stdin when omitted or "-"
        input: Option<PathBuf>,
    },

    /// Print the shared constant groups as JSON
    Constants,

    /// Print the effective execution limits
    Limits {
        /// JSON file with limit overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print JSON Schema documents for the record shapes
    Schema {
        /// Record name (e.g. exercise, user-progress); all records when omitted
        name: Option<String>,

        /// Write one <name>.schema.json per record into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Check { schema, input } => {
            let matched = commands::check(schema, input.as_deref())?;
            return Ok(if matched { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Commands::Constants => {
            commands::print_constants()?;
        }
        Commands::Limits { config } => {
            commands::print_limits(config.as_deref())?;
        }
        Commands::Schema { name, out } => {
            commands::export_schemas(name.as_deref(), out.as_deref())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
