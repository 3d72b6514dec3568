//! # Descriptor Normalization Properties
//!
//! Property tests over the two stored select-option encodings and the
//! identifier newtypes.

use cms_core::{ContentName, FieldDescriptor, OptionSet, Slug};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    /// A bare list and `{values: list}` must normalize to the same set.
    #[test]
    fn legacy_and_structured_encodings_agree(values in prop::collection::vec("[a-z]{1,8}", 0..8)) {
        let legacy = OptionSet::from_value(&json!(values));
        let structured = OptionSet::from_value(&json!({ "values": values }));
        prop_assert_eq!(&legacy, &structured);
        prop_assert!(!legacy.multiple);
    }

    /// Normalized sets never contain duplicate values and keep first-seen order.
    #[test]
    fn normalized_values_are_unique(values in prop::collection::vec("[a-c]{1,2}", 0..12)) {
        let set = OptionSet::from_value(&json!({ "values": values, "multiple": true }));
        let allowed = set.allowed();
        let mut seen = std::collections::HashSet::new();
        for v in &allowed {
            prop_assert!(seen.insert(v.clone()));
        }
        let mut expected = Vec::new();
        for v in &values {
            if !expected.contains(v) {
                expected.push(v.clone());
            }
        }
        prop_assert_eq!(allowed, expected);
        prop_assert!(set.multiple);
    }

    /// Descriptors survive a serialize/deserialize cycle unchanged.
    #[test]
    fn descriptor_serialization_is_stable(
        id in "[a-z][a-z0-9_]{0,10}",
        values in prop::collection::vec("[a-z]{1,5}", 1..5),
        multiple in any::<bool>(),
    ) {
        let raw = json!({
            "id": id,
            "type": "select",
            "options": { "values": values, "multiple": multiple },
        });
        let desc: FieldDescriptor = serde_json::from_value(raw).unwrap();
        let again: FieldDescriptor =
            serde_json::from_value(serde_json::to_value(&desc).unwrap()).unwrap();
        prop_assert_eq!(desc, again);
    }

    /// Safe identifiers are always accepted.
    #[test]
    fn safe_names_accepted(name in "[A-Za-z0-9_-]{1,64}") {
        prop_assert!(ContentName::new(name.clone()).is_ok());
        if name != "new" {
            prop_assert!(Slug::new(name).is_ok());
        }
    }

    /// Any path separator or dot makes a name unusable.
    #[test]
    fn separators_rejected(prefix in "[a-z]{0,5}", sep in "[./\\\\]", suffix in "[a-z]{0,5}") {
        let name = format!("{prefix}{sep}{suffix}");
        prop_assert!(ContentName::new(name.clone()).is_err());
        prop_assert!(Slug::new(name).is_err());
    }
}
