//! # Content API
//!
//! Lists available schemas and reads or writes the single document stored
//! for a `{type, name}` pair (the page file, or the blog index).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use cms_core::ContentRef;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{accept, DocumentResponse, SaveResponse};
use crate::error::AppError;
use crate::extractors::{content_ref, extract_json};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    /// Whether a compiled schema was cached before the reload.
    pub reloaded: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cms", get(list_content))
        .route("/api/cms/{type}/{name}", get(read_document).put(write_document))
        .route("/api/cms/reload/{type}/{name}", post(reload_schema))
}

/// GET /api/cms — every `{type, name}` with a schema file.
async fn list_content(State(state): State<AppState>) -> Result<Json<Vec<ContentRef>>, AppError> {
    Ok(Json(state.store.list_schemas().await?))
}

/// GET /api/cms/{type}/{name} — schema plus stored document.
async fn read_document(
    State(state): State<AppState>,
    Path((content_type, name)): Path<(String, String)>,
) -> Result<Json<DocumentResponse>, AppError> {
    let content = content_ref(&content_type, &name)?;
    read(&state, &content).await.map(Json)
}

/// PUT /api/cms/{type}/{name} — validate and store the document.
async fn write_document(
    State(state): State<AppState>,
    Path((content_type, name)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let content = content_ref(&content_type, &name)?;
    let document = extract_json(body)?;
    write(&state, &content, &document).await.map(Json)
}

/// POST /api/cms/reload/{type}/{name} — drop the compiled schema so the
/// next request recompiles it from disk.
async fn reload_schema(
    State(state): State<AppState>,
    Path((content_type, name)): Path<(String, String)>,
) -> Result<Json<ReloadResponse>, AppError> {
    let content = content_ref(&content_type, &name)?;
    let reloaded = state.schemas.invalidate(&content);
    Ok(Json(ReloadResponse {
        success: true,
        reloaded,
    }))
}

pub(crate) async fn read(state: &AppState, content: &ContentRef) -> Result<DocumentResponse, AppError> {
    let schema = state.schema(content).await?;
    let data = state
        .store
        .read_json(&state.store.document_path(content))
        .await?
        .unwrap_or_else(|| Value::Object(Map::new()));
    Ok(DocumentResponse {
        schema: schema.source.clone(),
        data,
    })
}

pub(crate) async fn write(
    state: &AppState,
    content: &ContentRef,
    document: &Value,
) -> Result<SaveResponse, AppError> {
    let schema = state.schema(content).await?;
    let data = accept(&schema, document)?;
    state
        .store
        .write_json(&state.store.document_path(content), &data)
        .await?;
    tracing::info!(content = %content, "document saved");
    Ok(SaveResponse {
        success: true,
        data,
    })
}
