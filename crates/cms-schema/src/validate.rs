//! # Validation Executor
//!
//! Walks a compiled [`Node`] and an input value in lock-step, building the
//! normalized value and collecting every [`Issue`] on the way. Sibling
//! branches are always visited, so one run reports every problem in the
//! document.
//!
//! Missing values (absent keys and `null`) are reported only by required
//! nodes. Optional nodes omit absent keys and pass `null` through. Keys
//! present in the input but not declared by the schema are copied to the
//! output untouched.

use cms_core::FieldPath;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::link;
use crate::node::{ChoiceRule, ListRule, Member, Node, NumberRule, StrFormat, StrRule};
use crate::report::ErrorReport;

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: FieldPath,
    pub message: String,
}

/// Outcome of validating one document. There is no partial acceptance.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Every field satisfied its rule; carries the normalized document.
    Accepted(Value),
    /// At least one issue, in discovery order.
    Rejected(Vec<Issue>),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Normalized value, if accepted.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Accepted(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }

    /// Issues, empty if accepted.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Accepted(_) => &[],
            Self::Rejected(issues) => issues,
        }
    }

    /// Projected error map, if rejected.
    pub fn report(&self) -> Option<ErrorReport> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(issues) => Some(ErrorReport::from_issues(issues)),
        }
    }

    pub fn into_result(self) -> Result<Value, Vec<Issue>> {
        match self {
            Self::Accepted(v) => Ok(v),
            Self::Rejected(issues) => Err(issues),
        }
    }
}

/// Validate a whole document against a root record node.
pub(crate) fn validate_document(root: &Node, document: &Value) -> Validation {
    if !document.is_object() {
        return Validation::Rejected(vec![Issue {
            path: FieldPath::root(),
            message: "El documento debe ser un objeto".to_string(),
        }]);
    }
    let mut exec = Executor::default();
    let normalized = exec.check(root, Some(document));
    if exec.issues.is_empty() {
        Validation::Accepted(normalized.unwrap_or(Value::Null))
    } else {
        Validation::Rejected(exec.issues)
    }
}

fn is_missing(input: Option<&Value>) -> bool {
    matches!(input, None | Some(Value::Null))
}

#[derive(Default)]
struct Executor {
    path: FieldPath,
    issues: Vec<Issue>,
}

impl Executor {
    fn report(&mut self, message: String) {
        self.issues.push(Issue {
            path: self.path.clone(),
            message,
        });
    }

    /// Returns the normalized value, or `None` when the key should be absent.
    fn check(&mut self, node: &Node, input: Option<&Value>) -> Option<Value> {
        match node {
            Node::Str(rule) => self.check_str(rule, input),
            Node::Number(rule) => self.check_number(rule, input),
            Node::Choice(rule) => self.check_choice(rule, input),
            Node::Object(rule) => self.check_record(&rule.label, &rule.members, rule.required, input),
            Node::List(rule) => self.check_list(rule, input),
            Node::Media(rule) => self.check_record(&rule.label, &rule.members, rule.required, input),
        }
    }

    /// Shared handling of a missing value. `None` means the value is present.
    fn missing(&mut self, label: &str, required: bool, input: Option<&Value>) -> Option<Option<Value>> {
        if !is_missing(input) {
            return None;
        }
        if required {
            self.report(format!("{label} es requerido"));
            Some(None)
        } else {
            Some(input.cloned())
        }
    }

    fn check_str(&mut self, rule: &StrRule, input: Option<&Value>) -> Option<Value> {
        if let Some(out) = self.missing(&rule.label, rule.required, input) {
            return out;
        }
        let Some(Value::String(s)) = input else {
            self.report(format!("{} debe ser texto", rule.label));
            return None;
        };
        if s.is_empty() {
            if rule.required {
                self.report(format!("{} es requerido", rule.label));
            }
            return Some(Value::String(String::new()));
        }
        let ok = match rule.format {
            StrFormat::Plain => true,
            StrFormat::Link => link::is_link(s),
            StrFormat::Image => link::is_absolute_url(s),
            StrFormat::AbsoluteUrl => link::is_absolute_url(s),
        };
        if !ok {
            let message = match rule.format {
                StrFormat::Link => format!(
                    "{} debe ser una URL válida (http(s), relativa o ancla #)",
                    rule.label
                ),
                StrFormat::Image => format!("{} debe ser una URL de imagen válida", rule.label),
                _ => format!("{} debe ser una URL válida", rule.label),
            };
            self.report(message);
        }
        Some(Value::String(s.clone()))
    }

    fn check_number(&mut self, rule: &NumberRule, input: Option<&Value>) -> Option<Value> {
        if let Some(out) = self.missing(&rule.label, true, input) {
            return out;
        }
        match input {
            Some(Value::Number(n)) => Some(Value::Number(n.clone())),
            Some(Value::String(s)) => match coerce_number(s) {
                Some(n) => Some(Value::Number(n)),
                None => {
                    self.report(format!("{} debe ser un número", rule.label));
                    None
                }
            },
            _ => {
                self.report(format!("{} debe ser un número", rule.label));
                None
            }
        }
    }

    fn check_choice(&mut self, rule: &ChoiceRule, input: Option<&Value>) -> Option<Value> {
        if rule.multiple {
            return self.check_multi_choice(rule, input);
        }
        if let Some(out) = self.missing(&rule.label, rule.required, input) {
            return out;
        }
        match input {
            Some(Value::String(s)) if rule.allowed.iter().any(|a| a == s) => {
                Some(Value::String(s.clone()))
            }
            Some(Value::String(s)) if s.is_empty() && !rule.required => Some(Value::String(String::new())),
            _ => {
                self.report(format!(
                    "{} debe ser una de las opciones: {}",
                    rule.label,
                    rule.allowed.join(", ")
                ));
                None
            }
        }
    }

    fn check_multi_choice(&mut self, rule: &ChoiceRule, input: Option<&Value>) -> Option<Value> {
        if is_missing(input) {
            if rule.required {
                self.report(format!("Selecciona al menos un {}", rule.label));
                return None;
            }
            return input.cloned();
        }
        let Some(Value::Array(items)) = input else {
            self.report(format!("{} tiene un formato inválido", rule.label));
            return None;
        };
        if items.is_empty() && rule.required {
            self.report(format!("Selecciona al menos un {}", rule.label));
            return Some(Value::Array(Vec::new()));
        }
        let invalid: Vec<String> = items
            .iter()
            .filter(|item| match item {
                Value::String(s) => !rule.allowed.iter().any(|a| a == s),
                _ => true,
            })
            .map(|bad| bad.as_str().map(str::to_string).unwrap_or_else(|| bad.to_string()))
            .collect();
        match invalid.as_slice() {
            [] => {}
            [one] => self.report(format!("{} contiene una opción no válida: {one}", rule.label)),
            many => self.report(format!(
                "{} contiene opciones no válidas: {}",
                rule.label,
                many.join(", ")
            )),
        }
        Some(Value::Array(items.clone()))
    }

    fn check_record(
        &mut self,
        label: &str,
        members: &[Member],
        required: bool,
        input: Option<&Value>,
    ) -> Option<Value> {
        if let Some(out) = self.missing(label, required, input) {
            return out;
        }
        let Some(Value::Object(map)) = input else {
            self.report(format!("{label} tiene un formato inválido"));
            return None;
        };
        let mut out: Map<String, Value> = map.clone();
        for member in members {
            self.path.push_key(&member.id);
            let value = self.check(&member.node, map.get(&member.id));
            self.path.pop();
            match value {
                Some(v) => {
                    out.insert(member.id.clone(), v);
                }
                None => {
                    out.remove(&member.id);
                }
            }
        }
        Some(Value::Object(out))
    }

    fn check_list(&mut self, rule: &ListRule, input: Option<&Value>) -> Option<Value> {
        if is_missing(input) {
            return Some(Value::Array(Vec::new()));
        }
        let Some(Value::Array(items)) = input else {
            self.report(format!("{} tiene un formato inválido", rule.label));
            return None;
        };
        let Some(element) = rule.element.as_deref() else {
            return Some(Value::Array(items.clone()));
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.path.push_index(i);
            let value = self.check(element, Some(item));
            self.path.pop();
            out.push(value.unwrap_or_else(|| item.clone()));
        }
        Some(Value::Array(out))
    }
}

/// Coerce a numeric string. Integral values become JSON integers.
fn coerce_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed: f64 = trimmed.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    // 2^53: the largest range where every integer is exactly representable.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if parsed.fract() == 0.0 && parsed.abs() <= MAX_EXACT {
        return Some(Number::from(parsed as i64));
    }
    Number::from_f64(parsed)
}
