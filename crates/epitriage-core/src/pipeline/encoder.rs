//! Feature encoding: raw form values into the aligned numeric vector the
//! classifier was fit on.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{one_hot_column, FeatureSchema, FieldKind, RawInput};

/// How numeric parse failures are handled.
///
/// The lenient mode reproduces the long-observed behavior: an unparseable
/// numeric field silently keeps its 0.0 default. Strict mode surfaces an
/// [`EncodingError`] instead. Debug builds default to strict so bad values
/// fail loudly before a release ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodePolicy {
    Strict,
    Lenient,
}

impl Default for EncodePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            EncodePolicy::Strict
        } else {
            EncodePolicy::Lenient
        }
    }
}

/// A numeric field that could not be parsed (strict mode only).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field {field:?}: cannot read {value:?} as a number")]
pub struct EncodingError {
    pub field: String,
    pub value: String,
}

/// Feature vector aligned to a classifier's expected column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl EncodedVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of one column, by name.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Encode one submission against a schema and an expected column list.
///
/// The output always has exactly `expected`'s length and order, whatever
/// subset of fields the submission populates: absent fields keep their
/// 0.0 default, and values whose column does not exist for this
/// classifier contribute nothing.
pub fn encode(
    input: &RawInput,
    schema: &FeatureSchema,
    expected: &[String],
    policy: EncodePolicy,
) -> Result<EncodedVector, EncodingError> {
    let index: HashMap<&str, usize> = expected
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let mut values = vec![0.0f64; expected.len()];

    for (field, value) in input.iter() {
        match schema.kind(field) {
            Some(FieldKind::Numeric) => {
                let parsed = match value.as_number() {
                    Some(n) => n,
                    None => match policy {
                        EncodePolicy::Strict => {
                            return Err(EncodingError {
                                field: field.to_string(),
                                value: value.category_token(),
                            });
                        }
                        EncodePolicy::Lenient => {
                            debug!(field, "numeric parse failure, keeping 0.0 default");
                            continue;
                        }
                    },
                };
                if let Some(&i) = index.get(field) {
                    values[i] = parsed;
                }
            }
            Some(FieldKind::Categorical(_)) => {
                let column = one_hot_column(field, &value.category_token());
                // A column the classifier was not fit on is silently dropped.
                if let Some(&i) = index.get(column.as_str()) {
                    values[i] = 1.0;
                }
            }
            // Fields outside the schema contribute nothing.
            None => {}
        }
    }

    Ok(EncodedVector {
        columns: expected.to_vec(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> FeatureSchema {
        let mut schema = FeatureSchema::new();
        schema.push_numeric("Age");
        schema.push_numeric("Temperature");
        schema.push_categorical("Fever", &["Yes", "No"]);
        schema.push_categorical("Lab_result", &["Positive", "Negative"]);
        schema
    }

    fn expected_columns() -> Vec<String> {
        ["Temperature", "Fever_Yes", "Fever_No", "Lab_result_Positive", "Age"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_shape_and_order_follow_expected_list() {
        let input = RawInput::new().with("Age", 30.0).with("Fever", "Yes");
        let vector = encode(&input, &sample_schema(), &expected_columns(), EncodePolicy::Strict)
            .unwrap();

        assert_eq!(vector.columns(), &expected_columns()[..]);
        assert_eq!(vector.values(), &[0.0, 1.0, 0.0, 0.0, 30.0]);
    }

    #[test]
    fn test_empty_input_yields_zero_vector() {
        let vector = encode(
            &RawInput::new(),
            &sample_schema(),
            &expected_columns(),
            EncodePolicy::Strict,
        )
        .unwrap();
        assert_eq!(vector.values(), &[0.0; 5]);
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        let input = RawInput::new().with("Temperature", "38.7");
        let vector = encode(&input, &sample_schema(), &expected_columns(), EncodePolicy::Strict)
            .unwrap();
        assert_eq!(vector.get("Temperature"), Some(38.7));
    }

    #[test]
    fn test_strict_policy_rejects_bad_numeric() {
        let input = RawInput::new().with("Temperature", "warm");
        let err = encode(&input, &sample_schema(), &expected_columns(), EncodePolicy::Strict)
            .unwrap_err();
        assert_eq!(err.field, "Temperature");
        assert_eq!(err.value, "warm");
    }

    #[test]
    fn test_lenient_policy_keeps_zero_default() {
        let input = RawInput::new()
            .with("Temperature", "warm")
            .with("Fever", "Yes");
        let vector = encode(&input, &sample_schema(), &expected_columns(), EncodePolicy::Lenient)
            .unwrap();
        assert_eq!(vector.get("Temperature"), Some(0.0));
        assert_eq!(vector.get("Fever_Yes"), Some(1.0));
    }

    #[test]
    fn test_one_hot_miss_is_dropped_without_disturbing_others() {
        // "Negative" has no column in this expected list.
        let input = RawInput::new()
            .with("Lab_result", "Negative")
            .with("Fever", "No");
        let vector = encode(&input, &sample_schema(), &expected_columns(), EncodePolicy::Strict)
            .unwrap();
        assert_eq!(vector.values(), &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unknown_field_contributes_nothing() {
        let input = RawInput::new().with("Shoe_size", 44.0).with("Age", 20.0);
        let vector = encode(&input, &sample_schema(), &expected_columns(), EncodePolicy::Strict)
            .unwrap();
        assert_eq!(vector.get("Age"), Some(20.0));
        assert_eq!(vector.values().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_expected_column_missing_from_schema_stays_zero() {
        let mut expected = expected_columns();
        expected.push("Not_in_schema".to_string());
        let input = RawInput::new().with("Age", 20.0);
        let vector = encode(&input, &sample_schema(), &expected, EncodePolicy::Strict).unwrap();
        assert_eq!(vector.get("Not_in_schema"), Some(0.0));
        assert_eq!(vector.len(), 6);
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let input = RawInput::new()
            .with("Age", 27.0)
            .with("Temperature", 39.1)
            .with("Fever", "Yes")
            .with("Lab_result", "Positive");
        let schema = sample_schema();
        let expected = expected_columns();

        let first = encode(&input, &schema, &expected, EncodePolicy::Strict).unwrap();
        let second = encode(&input, &schema, &expected, EncodePolicy::Strict).unwrap();
        assert_eq!(first, second);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // The output shape never depends on which fields are present.
            #[test]
            fn shape_is_invariant(
                age in proptest::option::of(0.0f64..120.0),
                temp in proptest::option::of(30.0f64..43.0),
                fever in proptest::option::of(prop::bool::ANY),
                lab in proptest::option::of(prop::bool::ANY),
            ) {
                let mut input = RawInput::new();
                if let Some(age) = age {
                    input.insert("Age", age);
                }
                if let Some(temp) = temp {
                    input.insert("Temperature", temp);
                }
                if let Some(fever) = fever {
                    input.insert("Fever", if fever { "Yes" } else { "No" });
                }
                if let Some(lab) = lab {
                    input.insert("Lab_result", if lab { "Positive" } else { "Negative" });
                }

                let expected = expected_columns();
                let vector = encode(&input, &sample_schema(), &expected, EncodePolicy::Strict).unwrap();
                prop_assert_eq!(vector.columns(), &expected[..]);
                prop_assert_eq!(vector.len(), expected.len());
            }
        }
    }
}
