//! # Extraction Helpers
//!
//! Map axum extractor rejections and raw path parameters to [`AppError`].

use axum::extract::rejection::JsonRejection;
use axum::Json;
use cms_core::{ContentName, ContentRef, Slug, RESERVED_NEW_SLUG};
use serde_json::Value;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<Value>, JsonRejection>) -> Result<..., AppError> {
///     let doc = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse `{type}/{name}` path parameters.
pub fn content_ref(content_type: &str, name: &str) -> Result<ContentRef, AppError> {
    Ok(ContentRef::parse(content_type, name)?)
}

/// Parse a `{name}` path parameter.
pub fn content_name(name: &str) -> Result<ContentName, AppError> {
    Ok(ContentName::new(name)?)
}

/// Slug a blog write is stored under: `meta.slug` from the body when it is
/// a non-empty string, else the path slug. The reserved `new` slug and
/// malformed slugs are rejected with 422.
pub fn entry_slug(path_slug: &str, body: &Value) -> Result<Slug, AppError> {
    let raw = body
        .pointer("/meta/slug")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(path_slug);
    if raw == RESERVED_NEW_SLUG {
        return Err(AppError::Validation("Valid slug is required".to_string()));
    }
    Slug::new(raw).map_err(|e| AppError::Validation(e.to_string()))
}
