//! # Upload API
//!
//! Accepts one image per request as the first multipart part and stores it
//! under `uploads/` with a timestamp name. The returned URL is relative to
//! the site root.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// MIME types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload_image))
}

fn no_file() -> AppError {
    AppError::BadRequest("No se recibió ningún archivo".to_string())
}

fn invalid_file() -> AppError {
    AppError::BadRequest("Archivo inválido".to_string())
}

/// POST /api/upload — store one image.
async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|_| no_file())?;
    let field = multipart
        .next_field()
        .await
        .map_err(|_| no_file())?
        .ok_or_else(no_file)?;

    let file_name = field.file_name().map(str::to_string).ok_or_else(invalid_file)?;
    let content_type = field.content_type().map(str::to_ascii_lowercase);
    if !content_type
        .as_deref()
        .is_some_and(|ct| ALLOWED_IMAGE_TYPES.contains(&ct))
    {
        return Err(AppError::BadRequest(
            "Solo se permiten imágenes (JPEG, PNG, WebP, GIF)".to_string(),
        ));
    }
    let extension = file_extension(&file_name).ok_or_else(invalid_file)?;

    let data = field.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "upload body could not be read");
        invalid_file()
    })?;
    if data.is_empty() {
        return Err(invalid_file());
    }

    let filename = state.store.save_upload(&extension, &data).await?;
    Ok(Json(UploadResponse {
        success: true,
        url: format!("/uploads/{filename}"),
        filename,
    }))
}

/// Lower-cased extension after the last `.`, limited to ASCII alphanumerics.
fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
