//! Class-id to label resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::CaseLabel;

/// Lookup table from a classifier's raw class id to its display label.
///
/// Either the fixed four-level table or the target map persisted with a
/// trained artifact; both forms accompany real classifiers, so both are
/// supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabelTable {
    entries: BTreeMap<i64, String>,
}

impl ClassLabelTable {
    /// The fixed four-level table used when an artifact carries no target
    /// map of its own.
    pub fn four_level() -> Self {
        let entries = [
            CaseLabel::NotACase,
            CaseLabel::Suspected,
            CaseLabel::Probable,
            CaseLabel::Confirmed,
        ]
        .into_iter()
        .enumerate()
        .map(|(id, label)| (id as i64, label.as_str().to_string()))
        .collect();
        Self { entries }
    }

    /// Table from a target map persisted with the trained model.
    pub fn from_target_map(entries: BTreeMap<i64, String>) -> Self {
        Self { entries }
    }

    /// Resolve a raw class id. Unknown ids resolve to a clearly marked
    /// fallback so they stay visible to the operator instead of failing.
    pub fn resolve(&self, class_id: i64) -> String {
        match self.entries.get(&class_id) {
            Some(label) => label.clone(),
            None => {
                warn!(class_id, "class id missing from label table");
                format!("Unknown Class ({class_id})")
            }
        }
    }

    pub fn contains(&self, class_id: i64) -> bool {
        self.entries.contains_key(&class_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ClassLabelTable {
    fn default() -> Self {
        Self::four_level()
    }
}
