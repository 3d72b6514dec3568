//! # cms-cli — CLI Tool for Esquema CMS
//!
//! Provides the `cms` command-line interface for working with schemas and
//! documents outside the HTTP service.
//!
//! ## Subcommands
//!
//! - `cms validate --schema <file> <document>` — validate a document.
//! - `cms schema <file>` — print the compiled field layout of a schema.
//! - `cms list [--root <dir>]` — list content types with a schema.
//!
//! ```bash
//! cms validate --schema public/cms/page.home.yaml public/data/home.json
//! cms schema public/cms/blog.news.yaml --json
//! ```

pub mod list;
pub mod schema;
pub mod validate;
