//! # List Subcommand
//!
//! Lists the `{type, name}` pairs that have a schema under `<root>/cms`,
//! the same set `GET /api/cms` serves.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cms_core::{CmsError, ContentRef};

/// Arguments for the `cms list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Content root holding the `cms/` schema directory.
    #[arg(long, default_value = "./public")]
    pub root: PathBuf,
}

pub fn run_list(args: &ListArgs) -> Result<u8> {
    let refs = list_content(&args.root)
        .with_context(|| format!("failed to read {}", args.root.join("cms").display()))?;
    if refs.is_empty() {
        tracing::warn!(root = %args.root.display(), "no schemas found");
    }
    for content in &refs {
        println!("{}\t{}", content.content_type, content.name);
    }
    Ok(0)
}

/// Sorted content refs for every well-named schema file. A missing schema
/// directory lists nothing.
pub fn list_content(root: &Path) -> Result<Vec<ContentRef>, CmsError> {
    let dir = root.join("cms");
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut refs = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if let Some(content) = entry
            .file_name()
            .to_str()
            .and_then(ContentRef::from_schema_file_name)
        {
            refs.push(content);
        }
    }
    refs.sort();
    Ok(refs)
}
