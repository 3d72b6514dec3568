//! # Compiled Validator Nodes
//!
//! A [`Node`] is the executable form of exactly one field descriptor. Nodes
//! hold no per-run state; the executor in [`crate::validate`] threads all
//! mutable state (current path, collected issues) itself.

/// Tagged validator node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Scalar string with a format constraint.
    Str(StrRule),
    /// Scalar number, numeric strings coerced.
    Number(NumberRule),
    /// Enumerated value, single or multiple.
    Choice(ChoiceRule),
    /// Record of named children.
    Object(ObjectRule),
    /// Sequence of elements sharing one element node.
    List(ListRule),
    /// Media record: declared children, or the minimal `{type, link}` shape.
    Media(MediaRule),
}

impl Node {
    /// Label used in this node's messages.
    pub fn label(&self) -> &str {
        match self {
            Self::Str(r) => &r.label,
            Self::Number(r) => &r.label,
            Self::Choice(r) => &r.label,
            Self::Object(r) => &r.label,
            Self::List(r) => &r.label,
            Self::Media(r) => &r.label,
        }
    }

    /// Whether a missing value is reported.
    pub fn is_required(&self) -> bool {
        match self {
            Self::Str(r) => r.required,
            Self::Number(_) => true,
            Self::Choice(r) => r.required,
            Self::Object(r) => r.required,
            Self::List(_) => false,
            Self::Media(r) => r.required,
        }
    }
}

/// What a string value must look like once non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrFormat {
    /// Any text.
    Plain,
    /// `#anchor`, relative path, or absolute http(s) URL.
    Link,
    /// Absolute URL of an image.
    Image,
    /// Absolute URL of any scheme (minimal media `link`).
    AbsoluteUrl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrRule {
    pub label: String,
    pub format: StrFormat,
    /// Required strings must be present and non-empty.
    pub required: bool,
}

impl StrRule {
    /// A string that accepts anything textual, including absence.
    pub fn unconstrained(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            format: StrFormat::Plain,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberRule {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceRule {
    pub label: String,
    /// Never empty; an empty set compiles to an unconstrained string instead.
    pub allowed: Vec<String>,
    pub multiple: bool,
    pub required: bool,
}

/// A named child of a record node.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: String,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRule {
    pub label: String,
    pub members: Vec<Member>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRule {
    pub label: String,
    /// `None` accepts elements of any shape.
    pub element: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    pub label: String,
    pub members: Vec<Member>,
    pub required: bool,
    /// Set when no children were declared and `members` holds `{type, link}`.
    pub minimal: bool,
}
