//! # Blog API
//!
//! Blogs are `{type: blog}` content whose entries live one file per slug
//! next to the blog index. Every entry is validated against the blog's
//! schema.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use cms_core::{ContentName, ContentRef, ContentType, Slug, RESERVED_NEW_SLUG};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{accept, content, DocumentResponse, SaveResponse};
use crate::error::AppError;
use crate::extractors::{content_name, entry_slug, extract_json};
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct EntrySaveResponse {
    pub success: bool,
    pub data: Value,
    pub slug: Slug,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cms/blog/{name}", get(list_entries).put(write_index))
        .route(
            "/api/cms/blog/{name}/{slug}",
            get(read_entry).post(create_entry).put(write_entry),
        )
}

fn blog_ref(name: ContentName) -> ContentRef {
    ContentRef::new(ContentType::Blog, name)
}

/// GET /api/cms/blog/{name} — entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let name = content_name(&name)?;
    Ok(Json(state.store.list_entries(&name).await?))
}

/// PUT /api/cms/blog/{name} — validate and store the blog index document.
async fn write_index(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let blog = blog_ref(content_name(&name)?);
    let document = extract_json(body)?;
    content::write(&state, &blog, &document).await.map(Json)
}

/// GET /api/cms/blog/{name}/{slug} — schema plus entry; `new` yields `{}`.
async fn read_entry(
    State(state): State<AppState>,
    Path((name, slug)): Path<(String, String)>,
) -> Result<Json<DocumentResponse>, AppError> {
    let name = content_name(&name)?;
    let schema = state.schema(&blog_ref(name.clone())).await?;
    let data = if slug == RESERVED_NEW_SLUG {
        None
    } else {
        let slug = Slug::new(slug)?;
        state.store.read_json(&state.store.entry_path(&name, &slug)).await?
    };
    Ok(Json(DocumentResponse {
        schema: schema.source.clone(),
        data: data.unwrap_or_else(|| Value::Object(Map::new())),
    }))
}

/// POST /api/cms/blog/{name}/{slug} — create a new entry; 409 if it exists.
async fn create_entry(
    State(state): State<AppState>,
    Path((name, slug)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntrySaveResponse>, AppError> {
    save_entry(&state, &name, &slug, body, true).await.map(Json)
}

/// PUT /api/cms/blog/{name}/{slug} — create or overwrite an entry.
async fn write_entry(
    State(state): State<AppState>,
    Path((name, slug)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EntrySaveResponse>, AppError> {
    save_entry(&state, &name, &slug, body, false).await.map(Json)
}

fn slug_taken(slug: &Slug) -> AppError {
    AppError::Conflict(format!("Entry with slug \"{slug}\" already exists"))
}

async fn save_entry(
    state: &AppState,
    name: &str,
    path_slug: &str,
    body: Result<Json<Value>, JsonRejection>,
    create: bool,
) -> Result<EntrySaveResponse, AppError> {
    let name = content_name(name)?;
    let document = extract_json(body)?;
    let slug = entry_slug(path_slug, &document)?;
    let path = state.store.entry_path(&name, &slug);

    if create && state.store.exists(&path).await? {
        return Err(slug_taken(&slug));
    }

    let schema = state.schema(&blog_ref(name.clone())).await?;
    let data = accept(&schema, &document)?;
    let written = if create {
        state.store.create_json(&path, &data).await
    } else {
        state.store.write_json(&path, &data).await
    };
    match written {
        Ok(()) => {}
        Err(StoreError::AlreadyExists(_)) => return Err(slug_taken(&slug)),
        Err(e) => return Err(e.into()),
    }
    tracing::info!(blog = %name, slug = %slug, created = create, "blog entry saved");
    Ok(EntrySaveResponse {
        success: true,
        data,
        slug,
    })
}
