//! Clinical rule overrides.
//!
//! Each disease has a pure, total function over the raw (unencoded)
//! submission values. Conditions are checked in a strict order; the first
//! match wins, and its label replaces the classifier's answer outright.
//! The model's own label is never blended in, only kept for audit.

mod cholera;
mod lassa;
mod measles;

use crate::models::{CaseLabel, Disease, RawInput};

/// Outcome of the rule pass for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleVerdict {
    /// Authoritative label; replaces the model's answer.
    Override {
        label: CaseLabel,
        /// Name of the rule arm that fired, for audit display.
        rule: &'static str,
    },
    /// No opinion; the model's answer stands.
    Defer,
}

impl RuleVerdict {
    pub(crate) fn fire(label: CaseLabel, rule: &'static str) -> Self {
        RuleVerdict::Override { label, rule }
    }

    pub fn label(&self) -> Option<CaseLabel> {
        match self {
            RuleVerdict::Override { label, .. } => Some(*label),
            RuleVerdict::Defer => None,
        }
    }

    pub fn rule(&self) -> Option<&'static str> {
        match self {
            RuleVerdict::Override { rule, .. } => Some(rule),
            RuleVerdict::Defer => None,
        }
    }
}

/// Evaluate the override rules for one disease against one submission.
pub fn evaluate(disease: Disease, input: &RawInput) -> RuleVerdict {
    match disease {
        Disease::LassaFever => lassa::evaluate(input),
        Disease::Measles => measles::evaluate(input),
        Disease::Cholera => cholera::evaluate(input),
        // No override rules are defined for yellow fever.
        Disease::YellowFever => RuleVerdict::Defer,
    }
}

/// Field names a disease's rule function reads. Catalog validation checks
/// each of these against the disease's declared schema.
pub fn referenced_fields(disease: Disease) -> &'static [&'static str] {
    match disease {
        Disease::LassaFever => lassa::REFERENCED_FIELDS,
        Disease::Measles => measles::REFERENCED_FIELDS,
        Disease::Cholera => cholera::REFERENCED_FIELDS,
        Disease::YellowFever => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yellow_fever_always_defers() {
        let input = RawInput::new()
            .with("Jaundice", "Yes")
            .with("Fever", "Yes")
            .with("Bleeding", "Yes");
        assert_eq!(evaluate(Disease::YellowFever, &input), RuleVerdict::Defer);
        assert!(referenced_fields(Disease::YellowFever).is_empty());
    }

    #[test]
    fn test_rule_bearing_diseases_declare_their_fields() {
        for disease in [Disease::LassaFever, Disease::Measles, Disease::Cholera] {
            assert!(!referenced_fields(disease).is_empty(), "{disease}");
        }
    }

    #[test]
    fn test_verdict_accessors() {
        let verdict = RuleVerdict::fire(CaseLabel::Confirmed, "lassa.lab_positive");
        assert_eq!(verdict.label(), Some(CaseLabel::Confirmed));
        assert_eq!(verdict.rule(), Some("lassa.lab_positive"));
        assert_eq!(RuleVerdict::Defer.label(), None);
        assert_eq!(RuleVerdict::Defer.rule(), None);
    }
}
