//! # Field-Kind and Schema Compilers
//!
//! [`compile_field`] maps one descriptor to a [`Node`], recursing into
//! nested descriptors. The `nested` flag is an explicit parameter, so a
//! compiled node depends only on its descriptor and position.
//!
//! | kind | top level (`nested = false`) | nested |
//! |------|------------------------------|--------|
//! | string/text/richtext | non-empty string | any string or absent |
//! | number | number or numeric string | same |
//! | url | non-empty link | link, empty, or absent |
//! | image | absolute URL | absolute URL, empty, or absent |
//! | select | value in set / non-empty subset | absent allowed |
//! | object | must be present; children nested | may be absent |
//! | list | always optional, defaults to `[]`; children nested | same |
//! | media | must be present; children inherit the flag | may be absent |
//! | other | unconstrained string | same |

use std::collections::HashSet;
use std::sync::Arc;

use cms_core::{FieldDescriptor, FieldKind};
use serde_json::Value;

use crate::node::{
    ChoiceRule, ListRule, MediaRule, Member, Node, NumberRule, ObjectRule, StrFormat, StrRule,
};
use crate::validate::{self, Validation};

/// Label of the implicit top-level record.
pub(crate) const ROOT_LABEL: &str = "El documento";

/// Compile one field descriptor.
pub fn compile_field(desc: &FieldDescriptor, nested: bool) -> Node {
    let label = desc.label.clone();
    match &desc.kind {
        FieldKind::String | FieldKind::Text | FieldKind::RichText => Node::Str(StrRule {
            label,
            format: StrFormat::Plain,
            required: !nested,
        }),
        FieldKind::Number => Node::Number(NumberRule { label }),
        FieldKind::Url => Node::Str(StrRule {
            label,
            format: StrFormat::Link,
            required: !nested,
        }),
        FieldKind::Image => Node::Str(StrRule {
            label,
            format: StrFormat::Image,
            required: !nested,
        }),
        FieldKind::Select => compile_select(desc, nested),
        FieldKind::Object => Node::Object(ObjectRule {
            label,
            members: compile_members(&desc.fields, true),
            required: !nested,
        }),
        FieldKind::List => {
            let element = if desc.fields.is_empty() {
                None
            } else {
                Some(Box::new(Node::Object(ObjectRule {
                    label: label.clone(),
                    members: compile_members(&desc.fields, true),
                    required: true,
                })))
            };
            Node::List(ListRule { label, element })
        }
        FieldKind::Media => {
            if desc.fields.is_empty() {
                Node::Media(MediaRule {
                    members: minimal_media_members(),
                    label,
                    required: !nested,
                    minimal: true,
                })
            } else {
                // Media children keep the parent's own flag; a top-level
                // media field keeps its sub-fields strict.
                Node::Media(MediaRule {
                    members: compile_members(&desc.fields, nested),
                    label,
                    required: !nested,
                    minimal: false,
                })
            }
        }
        FieldKind::Other(kind) => {
            tracing::debug!(field = %desc.id, kind = %kind, "unknown field kind, accepting any string");
            Node::Str(StrRule::unconstrained(label))
        }
    }
}

fn compile_select(desc: &FieldDescriptor, nested: bool) -> Node {
    if desc.options.is_empty() {
        tracing::debug!(field = %desc.id, "select without usable options, accepting any string");
        return Node::Str(StrRule::unconstrained(desc.label.clone()));
    }
    Node::Choice(ChoiceRule {
        label: desc.label.clone(),
        allowed: desc.options.allowed(),
        multiple: desc.options.multiple,
        required: !nested,
    })
}

fn minimal_media_members() -> Vec<Member> {
    vec![
        Member {
            id: "type".to_string(),
            node: Node::Str(StrRule {
                label: "type".to_string(),
                format: StrFormat::Plain,
                required: true,
            }),
        },
        Member {
            id: "link".to_string(),
            node: Node::Str(StrRule {
                label: "link".to_string(),
                format: StrFormat::AbsoluteUrl,
                required: true,
            }),
        },
    ]
}

/// Compile sibling descriptors. On duplicate ids the first declaration wins.
pub(crate) fn compile_members(fields: &[FieldDescriptor], nested: bool) -> Vec<Member> {
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(fields.len());
    for desc in fields {
        if !seen.insert(desc.id.as_str()) {
            tracing::warn!(field = %desc.id, "duplicate field id among siblings, keeping first");
            continue;
        }
        members.push(Member {
            id: desc.id.clone(),
            node: compile_field(desc, nested),
        });
    }
    members
}

/// Compile a top-level field list. Every member is compiled with
/// `nested = false`.
pub fn compile_schema(fields: &[FieldDescriptor]) -> CompiledSchema {
    CompiledSchema::from_members(compile_members(fields, false))
}

/// An immutable compiled validator for a whole document.
///
/// Cloning shares the underlying node tree.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    root: Arc<Node>,
}

impl CompiledSchema {
    pub(crate) fn from_members(members: Vec<Member>) -> Self {
        Self {
            root: Arc::new(Node::Object(ObjectRule {
                label: ROOT_LABEL.to_string(),
                members,
                required: true,
            })),
        }
    }

    /// The root record node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level members in declaration order.
    pub fn members(&self) -> &[Member] {
        match self.root.as_ref() {
            Node::Object(rule) => &rule.members,
            _ => &[],
        }
    }

    /// Run the validator over one submitted document.
    pub fn validate(&self, document: &Value) -> Validation {
        validate::validate_document(&self.root, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_core::OptionSet;

    fn field(id: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new(id, id, kind)
    }

    #[test]
    fn text_kinds_required_only_at_top_level() {
        for kind in [FieldKind::String, FieldKind::Text, FieldKind::RichText] {
            let desc = field("t", kind);
            assert!(compile_field(&desc, false).is_required());
            assert!(!compile_field(&desc, true).is_required());
        }
    }

    #[test]
    fn unknown_kind_compiles_to_unconstrained_string() {
        let node = compile_field(&field("c", FieldKind::Other("color".into())), false);
        assert_eq!(node, Node::Str(StrRule::unconstrained("c")));
    }

    #[test]
    fn select_without_options_degrades() {
        let node = compile_field(&field("s", FieldKind::Select), false);
        assert_eq!(node, Node::Str(StrRule::unconstrained("s")));
    }

    #[test]
    fn select_with_options_compiles_to_choice() {
        let desc = field("s", FieldKind::Select).with_options(OptionSet::multiple(["a", "b"]));
        match compile_field(&desc, false) {
            Node::Choice(rule) => {
                assert_eq!(rule.allowed, vec!["a", "b"]);
                assert!(rule.multiple);
                assert!(rule.required);
            }
            other => panic!("expected choice, got {other:?}"),
        }
    }

    #[test]
    fn object_children_always_nested() {
        let desc = field("o", FieldKind::Object).with_fields(vec![field("name", FieldKind::String)]);
        match compile_field(&desc, false) {
            Node::Object(rule) => {
                assert!(rule.required);
                assert!(!rule.members[0].node.is_required());
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn media_children_inherit_parent_flag() {
        let desc = field("m", FieldKind::Media).with_fields(vec![field("alt", FieldKind::String)]);
        let Node::Media(top) = compile_field(&desc, false) else {
            panic!("expected media");
        };
        assert!(top.required);
        assert!(top.members[0].node.is_required());
        assert!(!top.minimal);

        let Node::Media(inner) = compile_field(&desc, true) else {
            panic!("expected media");
        };
        assert!(!inner.required);
        assert!(!inner.members[0].node.is_required());
    }

    #[test]
    fn media_without_children_uses_minimal_shape() {
        let Node::Media(rule) = compile_field(&field("m", FieldKind::Media), true) else {
            panic!("expected media");
        };
        assert!(rule.minimal);
        let ids: Vec<_> = rule.members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["type", "link"]);
        assert!(rule.members.iter().all(|m| m.node.is_required()));
    }

    #[test]
    fn list_without_children_accepts_anything() {
        let Node::List(rule) = compile_field(&field("l", FieldKind::List), false) else {
            panic!("expected list");
        };
        assert!(rule.element.is_none());
    }

    #[test]
    fn duplicate_sibling_ids_keep_first() {
        let schema = compile_schema(&[
            field("a", FieldKind::String),
            field("a", FieldKind::Number),
        ]);
        assert_eq!(schema.members().len(), 1);
        assert!(matches!(schema.members()[0].node, Node::Str(_)));
    }

    #[test]
    fn compiled_schema_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<CompiledSchema>();
    }
}
