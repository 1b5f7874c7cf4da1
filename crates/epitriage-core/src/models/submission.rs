//! Raw submission values as entered in the form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single field value as entered: text for categorical fields, a float
/// for numeric ones. Numeric fields submitted as text are parsed at
/// encode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Numeric view: numbers pass through, text is parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Number(_) => None,
            RawValue::Text(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
        }
    }

    /// Categorical token used for one-hot column composition and rule
    /// comparisons.
    pub fn category_token(&self) -> String {
        match self {
            RawValue::Text(s) => s.trim().to_string(),
            // Whole numbers render without a trailing ".0" so that
            // "Stage_2" style column names line up.
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 => format!("{}", *n as i64),
            RawValue::Number(n) => n.to_string(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// One submission's raw field values.
///
/// Built once per submission and read by both the encoder and the rule
/// engine; never mutated after hand-off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    fields: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, convenient for tests and the FFI layer.
    pub fn with(mut self, field: &str, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<RawValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    /// Numeric view of a field; `None` when missing or unparseable.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(RawValue::as_number)
    }

    /// Case-insensitive comparison against the entered value.
    pub fn value_is(&self, field: &str, expected: &str) -> bool {
        self.get(field)
            .map(|v| v.category_token().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }

    /// True when the field is absent or its value is one of `negatives`.
    /// Absent fields count as negative, matching the form's defaults.
    pub fn is_negative(&self, field: &str, negatives: &[&str]) -> bool {
        match self.get(field) {
            None => true,
            Some(value) => {
                let token = value.category_token();
                negatives.iter().any(|n| token.eq_ignore_ascii_case(n))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
