//! Per-disease input field declarations.

use serde::{Deserialize, Serialize};

/// Kind of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Continuous numeric input.
    Numeric,
    /// Enumerated category with a fixed, ordered vocabulary.
    Categorical(Vec<String>),
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Numeric)
    }

    /// Allowed values for a categorical field, empty for numeric ones.
    pub fn values(&self) -> &[String] {
        match self {
            FieldKind::Numeric => &[],
            FieldKind::Categorical(values) => values,
        }
    }
}

/// Compose the one-hot column name a categorical value encodes to.
///
/// This is the single naming convention shared by the encoder, the catalog
/// validator and the trained models' expected-feature lists.
pub fn one_hot_column(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Ordered field-name -> kind mapping for one disease.
///
/// Order matters: the form layer renders fields in declaration order, and
/// the derived-feature fallback walks it deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    fields: Vec<(String, FieldKind)>,
}

impl FeatureSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a continuous numeric field.
    pub fn push_numeric(&mut self, name: &str) {
        self.fields.push((name.to_string(), FieldKind::Numeric));
    }

    /// Declare a categorical field with its ordered vocabulary.
    pub fn push_categorical(&mut self, name: &str, values: &[&str]) {
        self.fields.push((
            name.to_string(),
            FieldKind::Categorical(values.iter().map(|v| v.to_string()).collect()),
        ));
    }

    /// Kind of a declared field, `None` for undeclared names.
    pub fn kind(&self, name: &str) -> Option<&FieldKind> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, kind)| kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every column name this schema can produce: the field name itself
    /// for numeric fields, one one-hot column per categorical value.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        for (name, kind) in self.iter() {
            match kind {
                FieldKind::Numeric => columns.push(name.to_string()),
                FieldKind::Categorical(values) => {
                    columns.extend(values.iter().map(|v| one_hot_column(name, v)));
                }
            }
        }
        columns
    }
}
