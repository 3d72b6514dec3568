//! # Field Descriptor Model
//!
//! The declarative shape of one form field, as loaded from a schema file:
//!
//! ```yaml
//! - id: category
//!   label: Categoría
//!   type: select
//!   options: { multiple: true, values: [news, { value: ev, label: Eventos }] }
//! - id: items
//!   label: Elementos
//!   type: list
//!   fields:
//!     - { id: name, label: Nombre, type: string }
//! ```
//!
//! Descriptors are read-only once loaded. Unknown keys are preserved in
//! [`FieldDescriptor::extra`] for the form UI; the core never reads them.
//!
//! ## Select options
//!
//! Two encodings of select options exist in stored schemas:
//!
//! - legacy: `options: [a, b]`
//! - structured: `options: { values: [a, {value: b, label: B}], multiple: true }`
//!
//! Both are normalized into one [`OptionSet`] during deserialization.
//! Shapes matching neither normalize to an empty set.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Every field kind a schema can declare.
///
/// Matching on this enum is exhaustive; [`FieldKind::Other`] is the explicit
/// arm for kinds this version does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text.
    String,
    /// Multi-line text.
    Text,
    /// Rich text (HTML/markdown produced by an editor widget).
    RichText,
    /// Numeric value; numeric strings are coerced.
    Number,
    /// Link target: absolute http(s), relative path, or `#anchor`.
    Url,
    /// Absolute image URL.
    Image,
    /// Choice from a fixed option set.
    Select,
    /// Group of named sub-fields.
    Object,
    /// Repeating rows of sub-fields.
    List,
    /// Media object (image/video) with its own sub-fields.
    Media,
    /// A kind this version does not recognise, kept verbatim.
    Other(String),
}

impl FieldKind {
    /// Parse a kind name. Never fails: unknown names become [`FieldKind::Other`].
    pub fn parse(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "text" => Self::Text,
            "richtext" => Self::RichText,
            "number" => Self::Number,
            "url" => Self::Url,
            "image" => Self::Image,
            "select" => Self::Select,
            "object" => Self::Object,
            "list" => Self::List,
            "media" => Self::Media,
            other => Self::Other(other.to_string()),
        }
    }

    /// The schema-file name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::Number => "number",
            Self::Url => "url",
            Self::Image => "image",
            Self::Select => "select",
            Self::Object => "object",
            Self::List => "list",
            Self::Media => "media",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One allowed select value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// An option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Canonical select options: allowed values plus a multiplicity flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    pub values: Vec<SelectOption>,
    #[serde(default)]
    pub multiple: bool,
}

impl OptionSet {
    /// Single-choice set over plain values.
    pub fn single<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(values.into_iter().map(SelectOption::plain), false)
    }

    /// Multi-choice set over plain values.
    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(values.into_iter().map(SelectOption::plain), true)
    }

    /// Normalize either stored encoding into the canonical form.
    ///
    /// Accepts a bare list (strings, scalars, or `{value, label}` pairs) or an
    /// object with a `values` list and optional `multiple` flag. Anything else
    /// yields an empty set.
    pub fn from_value(raw: &Value) -> Self {
        match raw {
            Value::Array(items) => Self::build(items.iter().filter_map(option_from_item), false),
            Value::Object(map) => match map.get("values") {
                Some(Value::Array(items)) => {
                    let multiple = map.get("multiple").and_then(Value::as_bool).unwrap_or(false);
                    Self::build(items.iter().filter_map(option_from_item), multiple)
                }
                _ => Self::default(),
            },
            _ => Self::default(),
        }
    }

    fn build(options: impl Iterator<Item = SelectOption>, multiple: bool) -> Self {
        let mut values: Vec<SelectOption> = Vec::new();
        for opt in options {
            if !values.iter().any(|v| v.value == opt.value) {
                values.push(opt);
            }
        }
        Self { values, multiple }
    }

    /// Allowed values in declaration order.
    pub fn allowed(&self) -> Vec<String> {
        self.values.iter().map(|o| o.value.clone()).collect()
    }

    /// Whether no values are allowed (the set is unusable as a constraint).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn option_from_item(item: &Value) -> Option<SelectOption> {
    if let Some(value) = scalar_to_string(item) {
        return Some(SelectOption::plain(value));
    }
    let map = item.as_object()?;
    let value = map.get("value").and_then(scalar_to_string)?;
    let label = map
        .get("label")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| value.clone());
    Some(SelectOption { value, label })
}

/// Declarative description of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFieldDescriptor", into = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    /// Result key and first path segment; unique among siblings.
    pub id: String,
    /// Human-readable name used in messages. Defaults to `id`.
    pub label: String,
    pub kind: FieldKind,
    /// Nested schema for `object`, `list` and `media`.
    pub fields: Vec<FieldDescriptor>,
    /// Canonical options; only meaningful for `select`.
    pub options: OptionSet,
    /// Any other keys from the schema file, untouched.
    pub extra: Map<String, Value>,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            fields: Vec::new(),
            options: OptionSet::default(),
            extra: Map::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_options(mut self, options: OptionSet) -> Self {
        self.options = options;
        self
    }
}

/// On-disk form of a descriptor, before normalization.
///
/// Everything except `id` is read loosely: a label that is a scalar is
/// stringified, a `type` that is not a string becomes [`FieldKind::Other`],
/// and `fields` that is not a list (or holds entries without an `id`)
/// contributes nothing. A malformed descriptor therefore still loads and
/// compiles to the permissive string rule.
#[derive(Serialize, Deserialize)]
struct RawFieldDescriptor {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<Value>,
    #[serde(rename = "type", alias = "kind", default, skip_serializing_if = "Option::is_none")]
    kind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn kind_from_value(raw: Option<&Value>) -> FieldKind {
    match raw {
        Some(Value::String(name)) => FieldKind::parse(name),
        Some(Value::Null) | None => FieldKind::Other(String::new()),
        Some(other) => FieldKind::Other(other.to_string()),
    }
}

fn fields_from_value(raw: Option<Value>) -> Vec<FieldDescriptor> {
    match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

impl From<RawFieldDescriptor> for FieldDescriptor {
    fn from(raw: RawFieldDescriptor) -> Self {
        let options = raw
            .options
            .as_ref()
            .map(OptionSet::from_value)
            .unwrap_or_default();
        Self {
            label: raw
                .label
                .as_ref()
                .and_then(scalar_to_string)
                .unwrap_or_else(|| raw.id.clone()),
            kind: kind_from_value(raw.kind.as_ref()),
            fields: fields_from_value(raw.fields),
            id: raw.id,
            options,
            extra: raw.extra,
        }
    }
}

impl From<FieldDescriptor> for RawFieldDescriptor {
    fn from(desc: FieldDescriptor) -> Self {
        let options = if desc.options.is_empty() && !desc.options.multiple {
            None
        } else {
            serde_json::to_value(&desc.options).ok()
        };
        let fields = if desc.fields.is_empty() {
            None
        } else {
            serde_json::to_value(&desc.fields).ok()
        };
        Self {
            id: desc.id,
            label: Some(Value::String(desc.label)),
            kind: Some(Value::String(desc.kind.to_string())),
            fields,
            options,
            extra: desc.extra,
        }
    }
}
