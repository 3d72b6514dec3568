//! # Validate Subcommand
//!
//! Validates one document file against one schema file, the same check the
//! API runs before every write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cms_schema::{load_document_file, load_schema_file, Validation};

/// Exit code for a document that failed validation.
pub const EXIT_REJECTED: u8 = 2;

/// Arguments for the `cms validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (YAML or JSON).
    #[arg(long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Document to validate (`.json`, or `.yaml`/`.yml`).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Print the normalized document or the error map as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when accepted, 2 when rejected. Unreadable inputs
/// are errors (exit 1).
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = load_schema_file(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    let document = load_document_file(&args.document)
        .with_context(|| format!("failed to load document {}", args.document.display()))?;

    let compiled = schema.compile();
    tracing::info!(
        schema = %args.schema.display(),
        fields = compiled.members().len(),
        "schema compiled"
    );

    let outcome = compiled.validate(&document);
    println!("{}", render(&outcome, args.json)?);
    Ok(if outcome.is_accepted() { 0 } else { EXIT_REJECTED })
}

/// Text or JSON rendering of a validation outcome.
pub fn render(outcome: &Validation, json: bool) -> Result<String> {
    match (outcome, json) {
        (Validation::Accepted(value), true) => Ok(serde_json::to_string_pretty(value)?),
        (Validation::Accepted(_), false) => Ok("ok".to_string()),
        (Validation::Rejected(_), true) => {
            let report = outcome.report().unwrap_or_default();
            Ok(serde_json::to_string_pretty(&report)?)
        }
        (Validation::Rejected(issues), false) => {
            let lines: Vec<String> = issues
                .iter()
                .map(|issue| {
                    let path = if issue.path.is_root() {
                        "(documento)".to_string()
                    } else {
                        issue.path.dotted()
                    };
                    format!("{path}: {}", issue.message)
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}
