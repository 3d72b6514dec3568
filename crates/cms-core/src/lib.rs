//! # cms-core — Foundational Types for Esquema CMS
//!
//! This crate defines the data shapes every other crate in the workspace
//! builds on. Every other crate depends on `cms-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Field descriptors are pure data.** [`FieldDescriptor`] describes one
//!    form field (id, label, kind, nested fields, options). It carries no
//!    behavior; compilation into validators lives in `cms-schema`.
//!
//! 2. **One canonical select encoding.** Schemas in the wild declare select
//!    options as a bare list of strings or as a structured
//!    `{values, multiple}` object. Both are normalized into [`OptionSet`]
//!    at deserialization time, so nothing downstream sees the raw forms.
//!
//! 3. **Closed kind enum with an explicit fallback.** [`FieldKind`] lists
//!    every known kind. Unknown kinds land in [`FieldKind::Other`] instead of
//!    failing to load.
//!
//! 4. **Validated identifiers.** [`ContentName`] and [`Slug`] reject
//!    anything that could escape the content directory.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cms-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod content;
pub mod error;
pub mod field;
pub mod path;

pub use content::{ContentName, ContentRef, ContentType, Slug, MAX_IDENTIFIER_LEN, RESERVED_NEW_SLUG};
pub use error::{CmsError, ValidationError};
pub use field::{FieldDescriptor, FieldKind, OptionSet, SelectOption};
pub use path::{FieldPath, PathSegment};
