//! # Content Store
//!
//! File-system layout under the content root:
//!
//! ```text
//! cms/<type>.<name>.yaml     schema files
//! data/<name>.json           page documents
//! data/<name>/index.json     blog index document
//! data/<name>/<slug>.json    blog entries
//! uploads/<millis>.<ext>     uploaded images
//! ```
//!
//! Every path component comes from a validated [`ContentName`], [`Slug`]
//! or a generated upload name, so no request can address a file outside
//! the root.

use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use cms_core::{ContentName, ContentRef, ContentType, Slug};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// File name of the blog index document inside a blog directory.
pub const BLOG_INDEX_FILE: &str = "index.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document is not valid JSON.
    #[error("corrupt document '{path}': {reason}")]
    Corrupt { path: String, reason: String },

    /// `create_json` found the target already present.
    #[error("document '{0}' already exists")]
    AlreadyExists(String),

    #[error("could not allocate a unique upload name")]
    UploadNameExhausted,
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn schema_dir(&self) -> PathBuf {
        self.root.join("cms")
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn schema_path(&self, content: &ContentRef) -> PathBuf {
        self.schema_dir().join(content.schema_file_name())
    }

    /// Document path for `{type, name}`: the page file or the blog index.
    pub fn document_path(&self, content: &ContentRef) -> PathBuf {
        match content.content_type {
            ContentType::Page => self.data_dir().join(format!("{}.json", content.name)),
            ContentType::Blog => self.blog_dir(&content.name).join(BLOG_INDEX_FILE),
        }
    }

    pub fn blog_dir(&self, name: &ContentName) -> PathBuf {
        self.data_dir().join(name.as_str())
    }

    pub fn entry_path(&self, name: &ContentName, slug: &Slug) -> PathBuf {
        self.blog_dir(name).join(format!("{slug}.json"))
    }

    /// Every `(page|blog).<name>.yaml` in the schema directory, sorted.
    /// A missing directory lists nothing.
    pub async fn list_schemas(&self) -> Result<Vec<ContentRef>, StoreError> {
        let mut dir = match tokio::fs::read_dir(self.schema_dir()).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut refs = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            match ContentRef::from_schema_file_name(name) {
                Some(content) => refs.push(content),
                None if name.ends_with(".yaml") => {
                    tracing::debug!(file = name, "skipping schema file with unrecognized name");
                }
                None => {}
            }
        }
        refs.sort();
        Ok(refs)
    }

    /// Raw schema text, or `None` if the schema file does not exist.
    pub async fn read_schema(&self, content: &ContentRef) -> Result<Option<String>, StoreError> {
        read_optional(&self.schema_path(content)).await
    }

    /// Read a JSON document, or `None` if it does not exist.
    pub async fn read_json(&self, path: &Path) -> Result<Option<Value>, StoreError> {
        let Some(text) = read_optional(path).await? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Write pretty-printed JSON, creating parent directories.
    pub async fn write_json(&self, path: &Path, value: &Value) -> Result<(), StoreError> {
        let text = prepare_write(path, value).await?;
        tokio::fs::write(path, text).await?;
        tracing::debug!(path = %path.display(), "document written");
        Ok(())
    }

    /// Like [`write_json`](Self::write_json), but only if `path` does not
    /// exist yet. The check and the create are one `create_new` open.
    pub async fn create_json(&self, path: &Path, value: &Value) -> Result<(), StoreError> {
        let text = prepare_write(path, value).await?;
        let open = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await;
        let mut file = match open {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), "document created");
        Ok(())
    }

    pub async fn exists(&self, path: &Path) -> Result<bool, StoreError> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    /// All entries of a blog except the index, each as `{slug, ...data}`,
    /// newest `meta.date` first. Entries without a parsable date sort last.
    pub async fn list_entries(&self, name: &ContentName) -> Result<Vec<Value>, StoreError> {
        let dir_path = self.blog_dir(name);
        let mut dir = match tokio::fs::read_dir(&dir_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut entries: Vec<(String, Option<i64>, Value)> = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let file_name = item.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name == BLOG_INDEX_FILE {
                continue;
            }
            let Some(slug) = file_name.strip_suffix(".json") else {
                continue;
            };
            let Some(data) = self.read_json(&item.path()).await? else {
                continue;
            };
            let date = data
                .pointer("/meta/date")
                .and_then(Value::as_str)
                .and_then(parse_entry_date);
            entries.push((slug.to_string(), date, with_slug(slug, data)));
        }
        entries.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.0.cmp(&b.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });
        Ok(entries.into_iter().map(|(_, _, v)| v).collect())
    }

    /// Store an upload as `uploads/<millis>.<ext>` and return the file name.
    /// The name is bumped by one millisecond until it is unused.
    pub async fn save_upload(&self, extension: &str, data: &[u8]) -> Result<String, StoreError> {
        let dir = self.uploads_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let mut stamp = Utc::now().timestamp_millis();
        for _ in 0..64 {
            let file_name = format!("{stamp}.{extension}");
            let open = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&file_name))
                .await;
            match open {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    tracing::info!(file = %file_name, bytes = data.len(), "upload stored");
                    return Ok(file_name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => stamp += 1,
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::UploadNameExhausted)
    }
}

async fn prepare_write(path: &Path, value: &Value) -> Result<String, StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `{slug, ...data}`. A non-object document is wrapped as `{slug, data}`.
fn with_slug(slug: &str, data: Value) -> Value {
    let mut out = Map::new();
    out.insert("slug".to_string(), Value::String(slug.to_string()));
    match data {
        Value::Object(map) => {
            for (k, v) in map {
                if k != "slug" {
                    out.insert(k, v);
                }
            }
        }
        other => {
            out.insert("data".to_string(), other);
        }
    }
    Value::Object(out)
}

/// Milliseconds since the epoch for an RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date (midnight UTC).
fn parse_entry_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
