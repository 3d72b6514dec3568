//! # Schema Documents
//!
//! A schema file holds either a flat field list or a map of sections. The
//! page schemas group fields by section (`meta`, `brand`, `navigation`,
//! `sections`, `footer`); blog schemas are usually flat.
//!
//! ```yaml
//! meta:
//!   - { id: title, type: string, label: Título }
//! navigation:
//!   id: navigation
//!   type: list
//!   fields:
//!     - { id: href, type: url }
//! sections:
//!   welcome:
//!     - { id: heading, type: string }
//!   about:
//!     - { id: body, type: richtext }
//! ```

use std::collections::BTreeMap;

use cms_core::{FieldDescriptor, FieldKind};
use serde::{Deserialize, Serialize};

use crate::compile::{compile_field, compile_members, CompiledSchema};
use crate::node::{Member, Node, ObjectRule};

/// Parsed schema file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaDocument {
    /// Top-level field list.
    Flat(Vec<FieldDescriptor>),
    /// Section key → section body, in key order.
    Sectioned(BTreeMap<String, SectionBody>),
}

/// Body of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionBody {
    /// A required record whose members are strict top-level fields.
    Fields(Vec<FieldDescriptor>),
    /// A single field stored under the section key.
    Field(FieldDescriptor),
    /// Named sub-sections; compiles to a required record of them.
    Sections(BTreeMap<String, SectionBody>),
}

/// One row of [`SchemaDocument::summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    /// Dotted id path; list elements are written as `[]`.
    pub path: String,
    pub kind: String,
    pub label: String,
    /// Whether the field was compiled with `nested = true`.
    pub nested: bool,
}

impl SchemaDocument {
    /// Compile into a document validator.
    pub fn compile(&self) -> CompiledSchema {
        match self {
            Self::Flat(fields) => CompiledSchema::from_members(compile_members(fields, false)),
            Self::Sectioned(sections) => {
                let members = sections
                    .iter()
                    .map(|(key, body)| Member {
                        id: key.clone(),
                        node: compile_section(key, body),
                    })
                    .collect();
                CompiledSchema::from_members(members)
            }
        }
    }

    /// Number of descriptors at every depth.
    pub fn field_count(&self) -> usize {
        fn count(fields: &[FieldDescriptor]) -> usize {
            fields.iter().map(|f| 1 + count(&f.fields)).sum()
        }
        fn count_body(body: &SectionBody) -> usize {
            match body {
                SectionBody::Fields(fields) => count(fields),
                SectionBody::Field(f) => 1 + count(&f.fields),
                SectionBody::Sections(sections) => sections.values().map(count_body).sum(),
            }
        }
        match self {
            Self::Flat(fields) => count(fields),
            Self::Sectioned(sections) => sections.values().map(count_body).sum(),
        }
    }

    /// Flattened listing of every field, depth first.
    pub fn summary(&self) -> Vec<FieldSummary> {
        let mut rows = Vec::new();
        match self {
            Self::Flat(fields) => summarize(fields, "", false, &mut rows),
            Self::Sectioned(sections) => summarize_sections(sections, "", &mut rows),
        }
        rows
    }
}

fn summarize_sections(
    sections: &BTreeMap<String, SectionBody>,
    prefix: &str,
    rows: &mut Vec<FieldSummary>,
) {
    for (key, body) in sections {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match body {
            SectionBody::Fields(fields) => {
                rows.push(section_row(key, &path));
                summarize(fields, &path, false, rows);
            }
            SectionBody::Field(field) => summarize_one(field, key, prefix, false, rows),
            SectionBody::Sections(inner) => {
                rows.push(section_row(key, &path));
                summarize_sections(inner, &path, rows);
            }
        }
    }
}

fn section_row(key: &str, path: &str) -> FieldSummary {
    FieldSummary {
        path: path.to_string(),
        kind: "section".to_string(),
        label: key.to_string(),
        nested: false,
    }
}

fn compile_section(key: &str, body: &SectionBody) -> Node {
    match body {
        SectionBody::Fields(fields) => Node::Object(ObjectRule {
            label: key.to_string(),
            members: compile_members(fields, false),
            required: true,
        }),
        SectionBody::Field(field) => compile_field(field, false),
        SectionBody::Sections(sections) => Node::Object(ObjectRule {
            label: key.to_string(),
            members: sections
                .iter()
                .map(|(inner, body)| Member {
                    id: inner.clone(),
                    node: compile_section(inner, body),
                })
                .collect(),
            required: true,
        }),
    }
}

fn summarize(fields: &[FieldDescriptor], prefix: &str, nested: bool, rows: &mut Vec<FieldSummary>) {
    for field in fields {
        summarize_one(field, &field.id, prefix, nested, rows);
    }
}

fn summarize_one(
    field: &FieldDescriptor,
    key: &str,
    prefix: &str,
    nested: bool,
    rows: &mut Vec<FieldSummary>,
) {
    let path = if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    };
    rows.push(FieldSummary {
        path: path.clone(),
        kind: field.kind.to_string(),
        label: field.label.clone(),
        nested,
    });
    match field.kind {
        FieldKind::Object => summarize(&field.fields, &path, true, rows),
        FieldKind::List => summarize(&field.fields, &format!("{path}.[]"), true, rows),
        FieldKind::Media => summarize(&field.fields, &path, nested, rows),
        _ => {}
    }
}
