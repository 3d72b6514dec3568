//! # cms-schema — Schema Compilation & Validation
//!
//! Turns a declarative field schema into an executable validator and runs
//! it over editor-submitted documents.
//!
//! ## Pipeline
//!
//! ```text
//! FieldDescriptor ─compile_field─▶ Node ─compile_schema─▶ CompiledSchema
//!                                                            │ validate(&Value)
//!                                                            ▼
//!                                     Validation::Accepted(normalized value)
//!                                     Validation::Rejected(Vec<Issue>) ─▶ ErrorReport
//! ```
//!
//! Compilation runs once per schema load; validation runs once per
//! submission. Both are pure and synchronous. A [`CompiledSchema`] is
//! immutable, `Send + Sync`, and cheap to clone, so one compiled schema
//! serves any number of concurrent validations.
//!
//! ## Nested relaxation
//!
//! Fields in the top-level field list are strict: text must be non-empty,
//! objects and media must be present. Fields reached through an `object`
//! or `list` are compiled with `nested = true` and become optional, so a
//! half-filled repeating row never blocks saving the rest of the document.
//! `media` children inherit the media field's own flag instead.
//!
//! ## Leniency
//!
//! Compilation never fails. Unknown kinds and malformed select options
//! degrade to an unconstrained string. The only configuration error is a
//! schema file that cannot be parsed at all ([`SchemaError`]).

pub mod cache;
pub mod compile;
pub mod document;
pub mod error;
pub mod link;
pub mod load;
pub mod node;
pub mod report;
pub mod validate;

pub use cache::{LoadedSchema, SchemaCache};
pub use compile::{compile_field, compile_schema, CompiledSchema};
pub use document::{FieldSummary, SchemaDocument, SectionBody};
pub use error::SchemaError;
pub use load::{
    load_document_file, load_schema_file, parse_document, parse_schema_document, parse_schema_source,
    schema_document_from_source,
};
pub use node::{ChoiceRule, ListRule, MediaRule, Member, Node, NumberRule, ObjectRule, StrFormat, StrRule};
pub use report::{message_for, project, ErrorReport};
pub use validate::{Issue, Validation};
