//! Measles override rules.
//!
//! Precedence: vaccination status (or a fully negative symptom picture)
//! clears the case before the pathognomonic-sign check can confirm it.

use crate::models::{CaseLabel, RawInput};

use super::RuleVerdict;

const VACCINATION_FIELD: &str = "vaccination_status";

/// Answers that count as a negative finding.
const NEGATIVE_ANSWERS: [&str; 3] = ["No", "Absent", "None"];

const SYMPTOM_FIELDS: [&str; 8] = [
    "fever",
    "rash",
    "cough",
    "runny_nose",
    "conjunctivitis",
    "koplik_spots",
    "travel_history",
    "exposure",
];

pub(super) const REFERENCED_FIELDS: &[&str] = &[
    VACCINATION_FIELD,
    "fever",
    "rash",
    "cough",
    "runny_nose",
    "conjunctivitis",
    "koplik_spots",
    "travel_history",
    "exposure",
];

pub(super) fn evaluate(input: &RawInput) -> RuleVerdict {
    let vaccinated = input.value_is(VACCINATION_FIELD, "Vaccinated");
    let all_negative = SYMPTOM_FIELDS
        .iter()
        .all(|f| input.is_negative(f, &NEGATIVE_ANSWERS));
    if vaccinated || all_negative {
        return RuleVerdict::fire(CaseLabel::NotACase, "measles.vaccinated_or_negative");
    }

    if input.value_is("koplik_spots", "Yes") && input.value_is("conjunctivitis", "Yes") {
        return RuleVerdict::fire(CaseLabel::Confirmed, "measles.koplik_conjunctivitis");
    }

    RuleVerdict::Defer
}
