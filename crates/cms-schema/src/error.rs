//! Configuration errors raised while loading schemas and documents.
//!
//! A document that fails validation is not an error here; it is a
//! [`crate::Validation::Rejected`] value.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// Schema text could not be parsed into any field list.
    #[error("schema parse error for '{source_name}': {reason}")]
    Parse {
        /// File name or other identifier of the schema source.
        source_name: String,
        reason: String,
    },

    /// A document file could not be read or decoded.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad { path: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
