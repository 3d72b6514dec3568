//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor: configuration, the on-disk content store,
//! and the compiled-schema cache.

use std::path::PathBuf;
use std::sync::Arc;

use cms_core::ContentRef;
use cms_schema::{LoadedSchema, SchemaCache};

use crate::error::AppError;
use crate::store::ContentStore;

/// Default request body limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory holding `cms/`, `data/` and `uploads/`.
    pub content_root: PathBuf,
    /// Upper bound for any request body, uploads included.
    pub max_upload_bytes: usize,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            content_root: PathBuf::from("./public"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `CMS_CONTENT_ROOT`, `CMS_MAX_UPLOAD_BYTES` and
    /// `CMS_CORS_ORIGINS`, falling back to defaults for unset or unparsable
    /// values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let content_root = lookup("CMS_CONTENT_ROOT")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.content_root);
        let max_upload_bytes = lookup("CMS_MAX_UPLOAD_BYTES")
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_upload_bytes);
        let cors_origins = lookup("CMS_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            port,
            content_root,
            max_upload_bytes,
            cors_origins,
        }
    }
}

/// Shared application state. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ContentStore,
    pub schemas: SchemaCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = ContentStore::new(config.content_root.clone());
        Self {
            config: Arc::new(config),
            store,
            schemas: SchemaCache::new(),
        }
    }

    /// State over `root` with default settings otherwise.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(AppConfig {
            content_root: root.into(),
            ..AppConfig::default()
        })
    }

    /// Compiled schema for `content`, loading it from disk on a cache miss.
    pub async fn schema(&self, content: &ContentRef) -> Result<Arc<LoadedSchema>, AppError> {
        if let Some(hit) = self.schemas.get(content) {
            return Ok(hit);
        }
        let text = self
            .store
            .read_schema(content)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("schema not found: {content}")))?;
        let loaded = LoadedSchema::parse(&text, &content.schema_file_name())?;
        tracing::info!(
            schema = %content,
            fields = loaded.document.field_count(),
            "schema compiled"
        );
        Ok(self.schemas.insert(content.clone(), loaded))
    }
}
