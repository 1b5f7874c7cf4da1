//! Lassa Fever override rules.
//!
//! Precedence:
//! 1. positive lab result confirms outright
//! 2. negative lab result with an all-negative symptom picture clears
//! 3. fever above threshold keeps the case suspected
//! 4. otherwise the model decides
//!
//! The all-negative check deliberately carries no temperature condition:
//! a negative lab plus an all-"No" symptom set clears the case even at
//! 39°C, because the fever check is only reached when the clear fails.

use crate::models::{CaseLabel, RawInput};

use super::RuleVerdict;

const LAB_FIELD: &str = "Latest_sample_final_laboratory_result";
const TEMPERATURE_FIELD: &str = "Current_body_temperature_c";

/// Fever threshold in °C.
const FEVER_THRESHOLD_C: f64 = 38.0;

/// Symptom fields checked by the all-negative rule (lab result excluded).
const SYMPTOM_FIELDS: [&str; 8] = [
    "Fever",
    "Abdominal_pain",
    "Bleeding_or_bruising",
    "Vomiting",
    "Sore_throat",
    "Diarrhea",
    "General_weakness",
    "Chest_pain",
];

pub(super) const REFERENCED_FIELDS: &[&str] = &[
    LAB_FIELD,
    TEMPERATURE_FIELD,
    "Fever",
    "Abdominal_pain",
    "Bleeding_or_bruising",
    "Vomiting",
    "Sore_throat",
    "Diarrhea",
    "General_weakness",
    "Chest_pain",
];

pub(super) fn evaluate(input: &RawInput) -> RuleVerdict {
    if input.value_is(LAB_FIELD, "Positive") {
        return RuleVerdict::fire(CaseLabel::Confirmed, "lassa.lab_positive");
    }

    // Absent lab results count as negative, matching the form's default.
    let lab_negative = input.is_negative(LAB_FIELD, &["Negative"]);
    let all_no = SYMPTOM_FIELDS.iter().all(|f| input.is_negative(f, &["No"]));
    if lab_negative && all_no {
        return RuleVerdict::fire(CaseLabel::NotACase, "lassa.all_negative");
    }

    if input
        .number(TEMPERATURE_FIELD)
        .is_some_and(|t| t > FEVER_THRESHOLD_C)
    {
        return RuleVerdict::fire(CaseLabel::Suspected, "lassa.fever");
    }

    RuleVerdict::Defer
}
