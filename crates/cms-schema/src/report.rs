//! # Error Projector
//!
//! Groups issues by dotted path so a form can show the first error under
//! each field without re-running validation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::validate::Issue;

/// Dotted path → messages in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport(BTreeMap<String, Vec<String>>);

impl ErrorReport {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for issue in issues {
            map.entry(issue.path.dotted())
                .or_default()
                .push(issue.message.clone());
        }
        Self(map)
    }

    /// First message recorded at `path`.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.0.get(path).and_then(|m| m.first()).map(String::as_str)
    }

    /// Every message recorded at `path`.
    pub fn messages_for(&self, path: &str) -> &[String] {
        self.0.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Project issues into an [`ErrorReport`].
pub fn project(issues: &[Issue]) -> ErrorReport {
    ErrorReport::from_issues(issues)
}

/// First message at `path` in `report`, if any.
pub fn message_for<'a>(path: &str, report: &'a ErrorReport) -> Option<&'a str> {
    report.message_for(path)
}
