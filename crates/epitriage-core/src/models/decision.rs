//! Decision output types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Disease;

/// Case-classification levels used by the clinical rules and the default
/// label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseLabel {
    NotACase,
    Suspected,
    Probable,
    Confirmed,
}

impl CaseLabel {
    /// Display string, matching the labels trained models were fit on.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseLabel::NotACase => "Not a Case",
            CaseLabel::Suspected => "Suspected Case",
            CaseLabel::Probable => "Probable Case",
            CaseLabel::Confirmed => "Confirmed Case",
        }
    }
}

impl fmt::Display for CaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one submission, with the audit context the form layer shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Locally generated id for audit display.
    pub decision_id: String,
    pub disease: Disease,
    /// Final label, after any clinical rule override.
    pub label: String,
    /// Raw class id the classifier returned.
    pub class_id: i64,
    /// The model's own label, kept even when a rule replaced it.
    pub model_label: String,
    /// Name of the clinical rule that fired, if any.
    pub rule_fired: Option<String>,
    /// Set when the expected-feature list had to be derived from the
    /// submission itself (unsafe for one-hot classifiers).
    pub derived_feature_list: bool,
    /// Decision timestamp (RFC 3339).
    pub decided_at: String,
}

impl Decision {
    /// Whether a clinical rule replaced the model's answer.
    pub fn was_overridden(&self) -> bool {
        self.rule_fired.is_some()
    }
}

/// One row's outcome from the batch path (no rule overrides there).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDecision {
    pub label: String,
    pub class_id: i64,
}
