//! # Content Identifiers
//!
//! Newtypes naming stored content: a [`ContentType`] (`page` or `blog`), a
//! [`ContentName`] (`home`, `news`), and for multi-entry content a [`Slug`].
//! The pair `{type, name}` is a [`ContentRef`], which keys both the schema
//! file (`page.home.yaml`) and the compiled-schema cache.
//!
//! ## Security Invariant
//!
//! Names and slugs become file-system path components. They are restricted
//! to ASCII alphanumerics, `-` and `_`, so no value can traverse out of the
//! content directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum byte length of a content name or slug.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Slug value the editor uses for "entry not yet created".
pub const RESERVED_NEW_SLUG: &str = "new";

/// Implements `Deserialize` for string newtypes by routing through `new()`,
/// so invalid values are rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Kind of stored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A single document per name.
    Page,
    /// A collection of slug-addressed entries per name.
    Blog,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Blog => "blog",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "blog" => Ok(Self::Blog),
            other => Err(ValidationError::UnknownContentType(other.to_string())),
        }
    }
}

fn is_safe_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_IDENTIFIER_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Name of a page or blog (`home`, `news`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContentName(String);

impl_validating_deserialize!(ContentName);

impl ContentName {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContentName`] for empty, overlong,
    /// or non `[A-Za-z0-9_-]` values.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_safe_identifier(&s) {
            return Err(ValidationError::InvalidContentName(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of one blog entry within its blog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slug(String);

impl_validating_deserialize!(Slug);

impl Slug {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSlug`] for the reserved value
    /// `new` and for anything a [`ContentName`] would reject.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s == RESERVED_NEW_SLUG || !is_safe_identifier(&s) {
            return Err(ValidationError::InvalidSlug(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `{type, name}` pair identifying one schema and its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentRef {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: ContentName,
}

impl ContentRef {
    pub fn new(content_type: ContentType, name: ContentName) -> Self {
        Self { content_type, name }
    }

    /// Parse `(type, name)` path parameters.
    pub fn parse(content_type: &str, name: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(content_type.parse()?, ContentName::new(name)?))
    }

    /// Schema file name for this content: `<type>.<name>.yaml`.
    pub fn schema_file_name(&self) -> String {
        format!("{self}.yaml")
    }

    /// Inverse of [`schema_file_name`](Self::schema_file_name). Returns
    /// `None` for files that do not follow the `(page|blog).<name>.yaml` form.
    pub fn from_schema_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".yaml")?;
        let (kind, name) = stem.split_once('.')?;
        let content_type = kind.parse().ok()?;
        let name = ContentName::new(name).ok()?;
        Some(Self::new(content_type, name))
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.content_type, self.name)
    }
}
