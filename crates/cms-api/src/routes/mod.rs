//! # Route Modules
//!
//! - `/api/cms`, `/api/cms/{type}/{name}`: schema listing and documents
//! - `/api/cms/blog/{name}[/{slug}]`: blog listing and entries
//! - `/api/upload`: image uploads
//!
//! Every write validates the submitted body against the compiled schema
//! before anything touches the disk; only the normalized value is stored.

pub mod blog;
pub mod content;
pub mod upload;

use cms_schema::{LoadedSchema, Validation};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// `{schema, data}` returned by document reads.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub schema: Value,
    pub data: Value,
}

/// `{success, data}` returned by document writes.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub data: Value,
}

/// Validate `document`, returning the normalized value or a 422 carrying
/// the projected error map.
pub(crate) fn accept(schema: &LoadedSchema, document: &Value) -> Result<Value, AppError> {
    match schema.compiled.validate(document) {
        Validation::Accepted(value) => Ok(value),
        Validation::Rejected(issues) => {
            tracing::info!(issues = issues.len(), "document rejected");
            Err(AppError::Rejected(cms_schema::project(&issues)))
        }
    }
}
