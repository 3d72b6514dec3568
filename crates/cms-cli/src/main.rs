//! # cms CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cms_cli::list::{run_list, ListArgs};
use cms_cli::schema::{run_schema, SchemaArgs};
use cms_cli::validate::{run_validate, ValidateArgs};

/// Esquema CMS toolchain.
///
/// Validates documents against field schemas and inspects schema files.
#[derive(Parser, Debug)]
#[command(name = "cms", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Validate(ValidateArgs),

    /// Print the field layout of a schema.
    Schema(SchemaArgs),

    /// List content types that have a schema.
    List(ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Schema(args) => run_schema(&args),
        Commands::List(args) => run_list(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
