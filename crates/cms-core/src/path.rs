//! # Field Paths
//!
//! A [`FieldPath`] locates a value inside a submitted document: object keys
//! are field ids, list elements are zero-based indices. Paths render in the
//! dotted form the editor UI keys its error messages by (`items.0.name`).

use std::fmt;

use serde::{Serialize, Serializer};

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field id inside an object.
    Key(String),
    /// An element index inside a list.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Ordered sequence of path segments from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments in order from the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Append a key segment in place.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(PathSegment::Key(key.into()));
    }

    /// Append an index segment in place.
    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    /// Remove the last segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Return a new path with `key` appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push_key(key);
        next
    }

    /// Return a new path with `index` appended.
    pub fn element(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.push_index(index);
        next
    }

    /// Dot-joined rendering, `""` for the root.
    pub fn dotted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.dotted())
    }
}
