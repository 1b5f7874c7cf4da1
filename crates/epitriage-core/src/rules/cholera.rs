//! Cholera override rules.
//!
//! Precedence: full unvaccinated presentation confirms, a vaccinated and
//! symptom-free patient clears, the classic GI pair stays suspected.

use crate::models::{CaseLabel, RawInput};

use super::RuleVerdict;

const VACCINATION_FIELD: &str = "Vaccination_status";

/// The full presentation required for a rule-level confirmation.
const CONFIRM_FIELDS: [&str; 4] = ["Diarrhea", "Vomiting", "Dehydration", "Tachycardia"];

/// Fields that must all be negative for the vaccinated clear.
const CLEAR_FIELDS: [&str; 3] = ["Diarrhea", "Vomiting", "Dehydration"];

pub(super) const REFERENCED_FIELDS: &[&str] = &[
    VACCINATION_FIELD,
    "Diarrhea",
    "Vomiting",
    "Dehydration",
    "Tachycardia",
];

pub(super) fn evaluate(input: &RawInput) -> RuleVerdict {
    let full_presentation = CONFIRM_FIELDS.iter().all(|f| input.value_is(f, "Yes"));
    if full_presentation && input.value_is(VACCINATION_FIELD, "Unvaccinated") {
        return RuleVerdict::fire(CaseLabel::Confirmed, "cholera.full_presentation");
    }

    let all_clear = CLEAR_FIELDS.iter().all(|f| input.is_negative(f, &["No"]));
    if all_clear && input.value_is(VACCINATION_FIELD, "Vaccinated") {
        return RuleVerdict::fire(CaseLabel::NotACase, "cholera.vaccinated_clear");
    }

    if input.value_is("Diarrhea", "Yes") && input.value_is("Vomiting", "Yes") {
        return RuleVerdict::fire(CaseLabel::Suspected, "cholera.gi_presentation");
    }

    RuleVerdict::Defer
}
