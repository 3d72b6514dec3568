//! # Compiled-Schema Cache
//!
//! Schemas are compiled once per load and reused for every submission until
//! the schema is reloaded. The cache is keyed by [`ContentRef`].
//!
//! The lock is `parking_lot` and is never held across `.await` or while a
//! loader runs, so async callers read files first and insert afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use cms_core::ContentRef;
use parking_lot::RwLock;
use serde_json::Value;

use crate::compile::CompiledSchema;
use crate::document::SchemaDocument;
use crate::error::SchemaError;
use crate::load::{parse_schema_source, schema_document_from_source};

/// A parsed schema together with its compiled validator.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    /// The schema as stored, for clients that render forms from it.
    pub source: Value,
    pub document: SchemaDocument,
    pub compiled: CompiledSchema,
}

impl LoadedSchema {
    pub fn new(source: Value, document: SchemaDocument) -> Self {
        let compiled = document.compile();
        Self {
            source,
            document,
            compiled,
        }
    }

    /// Parse and compile schema text.
    pub fn parse(text: &str, source_name: &str) -> Result<Self, SchemaError> {
        let source = parse_schema_source(text, source_name)?;
        let document = schema_document_from_source(&source, source_name)?;
        Ok(Self::new(source, document))
    }
}

/// Thread-safe, cloneable map of compiled schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    entries: Arc<RwLock<HashMap<ContentRef, Arc<LoadedSchema>>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ContentRef) -> Option<Arc<LoadedSchema>> {
        self.entries.read().get(key).cloned()
    }

    /// Store a loaded schema, replacing any previous entry.
    pub fn insert(&self, key: ContentRef, schema: LoadedSchema) -> Arc<LoadedSchema> {
        let schema = Arc::new(schema);
        self.entries.write().insert(key.clone(), Arc::clone(&schema));
        tracing::debug!(schema = %key, "compiled schema cached");
        schema
    }

    /// Return the cached entry, or run `load` and cache its result.
    ///
    /// Concurrent misses may both run `load`; the last insert wins.
    pub fn get_or_load<E>(
        &self,
        key: &ContentRef,
        load: impl FnOnce() -> Result<LoadedSchema, E>,
    ) -> Result<Arc<LoadedSchema>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let loaded = load()?;
        Ok(self.insert(key.clone(), loaded))
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &ContentRef) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            tracing::info!(schema = %key, "compiled schema invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached keys, sorted.
    pub fn keys(&self) -> Vec<ContentRef> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}
