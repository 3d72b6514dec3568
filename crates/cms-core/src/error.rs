//! # Error Types
//!
//! Defines the error types shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Note that a document failing schema validation is *not* an error in
//! this hierarchy: rejection is an ordinary value produced by the
//! validation executor in `cms-schema`.

use thiserror::Error;

/// Top-level error type for Esquema CMS.
#[derive(Error, Debug)]
pub enum CmsError {
    /// An identifier failed format validation.
    #[error("invalid identifier: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CmsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error constructing a validated identifier newtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Content type is not one of the served kinds.
    #[error("unknown content type '{0}': expected \"page\" or \"blog\"")]
    UnknownContentType(String),

    /// Content name is empty, too long, or contains disallowed characters.
    #[error("invalid content name '{0}'")]
    InvalidContentName(String),

    /// Slug is empty, too long, reserved, or contains disallowed characters.
    #[error("invalid slug '{0}'")]
    InvalidSlug(String),
}
