//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps identifier, schema and store errors to HTTP status codes and JSON
//! bodies of the form `{error: {code, message, details?}}`. A rejected
//! document carries its projected error map in `details`. Internal error
//! details are never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cms_schema::{ErrorReport, SchemaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    pub message: String,
    /// Additional details, present only for client errors that have them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request failed a rule outside the document schema (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Document failed schema validation (422).
    #[error("document rejected: {} field(s) invalid", .0.len())]
    Rejected(ErrorReport),

    /// Request could not be parsed (400). The message is shown verbatim.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with stored content (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) | Self::Rejected(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Client-facing message without the variant prefix.
    fn public_message(&self) -> String {
        match self {
            Self::NotFound(m) | Self::Validation(m) | Self::BadRequest(m) | Self::Conflict(m) => {
                m.clone()
            }
            Self::Rejected(_) => "document failed schema validation".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let message = self.public_message();
        let details = match &self {
            Self::Rejected(report) => serde_json::to_value(report).ok(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Path identifiers that fail validation are malformed requests.
impl From<cms_core::ValidationError> for AppError {
    fn from(err: cms_core::ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// A stored schema that cannot be parsed is a server configuration error.
impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}
