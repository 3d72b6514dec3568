//! # Schema Subcommand
//!
//! Parses and compiles a schema file, then prints every field with its
//! kind and whether it was compiled as nested (optional) or top level.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cms_schema::{load_schema_file, FieldSummary};

/// Arguments for the `cms schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema file (YAML or JSON).
    #[arg(value_name = "SCHEMA")]
    pub path: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let document = load_schema_file(&args.path)
        .with_context(|| format!("failed to load schema {}", args.path.display()))?;
    let compiled = document.compile();
    tracing::debug!(top_level = compiled.members().len(), "schema compiled");

    let rows = document.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
        println!("{} field(s)", document.field_count());
    }
    Ok(0)
}

/// One line per field: path, kind, label, and `(nested)` for relaxed fields.
pub fn render_table(rows: &[FieldSummary]) -> String {
    let width = rows.iter().map(|r| r.path.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let marker = if row.nested { "  (nested)" } else { "" };
        out.push_str(&format!(
            "{:<width$}  {:<9} {}{marker}\n",
            row.path, row.kind, row.label
        ));
    }
    out
}
