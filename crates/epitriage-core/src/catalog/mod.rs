//! Static per-disease schema declarations.
//!
//! The catalog is configuration: declared once at startup, serializable so
//! a deployment can ship field definitions as JSON, and validated against
//! the clinical rules before any prediction runs. Schema/rule
//! disagreements are surfaced as errors, never silently patched.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{one_hot_column, Disease, FeatureSchema, FieldKind};
use crate::rules;

/// Catalog validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{disease}: no schema declared")]
    MissingSchema { disease: Disease },

    #[error("{disease}: rule field {field:?} is not declared in the schema")]
    UndeclaredRuleField { disease: Disease, field: String },

    #[error("{disease}: column {column:?} is produced by more than one field")]
    ColumnCollision { disease: Disease, column: String },

    #[error("{disease}: field {field:?} value {value:?} produces malformed column {column:?}")]
    MalformedColumn {
        disease: Disease,
        field: String,
        value: String,
        column: String,
    },
}

/// Per-disease schema catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaCatalog {
    schemas: BTreeMap<Disease, FeatureSchema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog covering every disease in the build.
    pub fn default_catalog() -> Self {
        let mut catalog = Self::new();
        catalog.insert(Disease::LassaFever, lassa_schema());
        catalog.insert(Disease::Measles, measles_schema());
        catalog.insert(Disease::Cholera, cholera_schema());
        catalog.insert(Disease::YellowFever, yellow_fever_schema());
        catalog
    }

    /// Load a catalog shipped as JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, disease: Disease, schema: FeatureSchema) {
        self.schemas.insert(disease, schema);
    }

    pub fn schema(&self, disease: Disease) -> Option<&FeatureSchema> {
        self.schemas.get(&disease)
    }

    /// Check every disease's schema against the rule engine and the one-hot
    /// naming convention. Run at pipeline construction, before any
    /// submission is accepted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for disease in Disease::ALL {
            let schema = self
                .schema(disease)
                .ok_or(ValidationError::MissingSchema { disease })?;

            // Every field a rule function reads must be declared.
            for field in rules::referenced_fields(disease) {
                if !schema.contains(field) {
                    return Err(ValidationError::UndeclaredRuleField {
                        disease,
                        field: (*field).to_string(),
                    });
                }
            }

            // Every producible column must be unambiguous and match the
            // naming convention trained models expect.
            let mut seen: HashMap<String, String> = HashMap::new();
            for (field, kind) in schema.iter() {
                match kind {
                    FieldKind::Numeric => {
                        check_column(disease, field, "", field, &mut seen)?;
                    }
                    FieldKind::Categorical(values) => {
                        for value in values {
                            let column = one_hot_column(field, value);
                            check_column(disease, field, value, &column, &mut seen)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_column(
    disease: Disease,
    field: &str,
    value: &str,
    column: &str,
    seen: &mut HashMap<String, String>,
) -> Result<(), ValidationError> {
    if column.is_empty() || column.chars().any(char::is_whitespace) {
        return Err(ValidationError::MalformedColumn {
            disease,
            field: field.to_string(),
            value: value.to_string(),
            column: column.to_string(),
        });
    }
    if let Some(previous) = seen.insert(column.to_string(), field.to_string()) {
        if previous != field {
            return Err(ValidationError::ColumnCollision {
                disease,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn lassa_schema() -> FeatureSchema {
    let mut schema = FeatureSchema::new();
    schema.push_numeric("Age");
    schema.push_numeric("Current_body_temperature_c");
    for field in [
        "Fever",
        "Abdominal_pain",
        "Bleeding_or_bruising",
        "Vomiting",
        "Sore_throat",
        "Diarrhea",
        "General_weakness",
        "Chest_pain",
    ] {
        schema.push_categorical(field, &["Yes", "No"]);
    }
    schema.push_categorical(
        "Latest_sample_final_laboratory_result",
        &["Positive", "Negative", "Pending"],
    );
    schema
}

fn measles_schema() -> FeatureSchema {
    let mut schema = FeatureSchema::new();
    schema.push_numeric("age");
    for field in [
        "fever",
        "rash",
        "cough",
        "runny_nose",
        "conjunctivitis",
        "koplik_spots",
        "travel_history",
        "exposure",
    ] {
        schema.push_categorical(field, &["Yes", "No"]);
    }
    schema.push_categorical(
        "vaccination_status",
        &["Vaccinated", "Unvaccinated", "Unknown"],
    );
    schema
}

fn cholera_schema() -> FeatureSchema {
    let mut schema = FeatureSchema::new();
    schema.push_numeric("Age");
    for field in [
        "Diarrhea",
        "Vomiting",
        "Dehydration",
        "Tachycardia",
        "Abdominal_cramps",
    ] {
        schema.push_categorical(field, &["Yes", "No"]);
    }
    schema.push_categorical("Vaccination_status", &["Vaccinated", "Unvaccinated"]);
    schema
}

fn yellow_fever_schema() -> FeatureSchema {
    let mut schema = FeatureSchema::new();
    schema.push_numeric("Age");
    schema.push_numeric("Current_body_temperature_c");
    for field in [
        "Fever",
        "Jaundice",
        "Bleeding",
        "Vomiting",
        "Headache",
        "Muscle_pain",
    ] {
        schema.push_categorical(field, &["Yes", "No"]);
    }
    schema.push_categorical("Laboratory_result", &["Positive", "Negative", "Pending"]);
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        SchemaCatalog::default_catalog().validate().unwrap();
    }

    #[test]
    fn test_default_catalog_covers_all_diseases() {
        let catalog = SchemaCatalog::default_catalog();
        for disease in Disease::ALL {
            assert!(catalog.schema(disease).is_some(), "{disease}");
        }
    }

    #[test]
    fn test_missing_schema_rejected() {
        let mut catalog = SchemaCatalog::default_catalog();
        catalog.schemas.remove(&Disease::Cholera);
        assert!(matches!(
            catalog.validate(),
            Err(ValidationError::MissingSchema {
                disease: Disease::Cholera
            })
        ));
    }

    #[test]
    fn test_undeclared_rule_field_rejected() {
        let mut catalog = SchemaCatalog::default_catalog();
        // Drop the lab-result field the lassa rules read.
        let mut schema = FeatureSchema::new();
        schema.push_numeric("Current_body_temperature_c");
        catalog.insert(Disease::LassaFever, schema);

        assert!(matches!(
            catalog.validate(),
            Err(ValidationError::UndeclaredRuleField { disease: Disease::LassaFever, field })
                if field == "Latest_sample_final_laboratory_result"
        ));
    }

    #[test]
    fn test_column_collision_rejected() {
        let mut catalog = SchemaCatalog::default_catalog();
        let mut schema = yellow_fever_schema();
        // "Fever_Yes" collides with the one-hot column of "Fever".
        schema.push_numeric("Fever_Yes");
        catalog.insert(Disease::YellowFever, schema);

        assert!(matches!(
            catalog.validate(),
            Err(ValidationError::ColumnCollision { disease: Disease::YellowFever, column })
                if column == "Fever_Yes"
        ));
    }

    #[test]
    fn test_whitespace_column_rejected() {
        let mut catalog = SchemaCatalog::default_catalog();
        let mut schema = yellow_fever_schema();
        schema.push_categorical("Sample_type", &["Whole blood"]);
        catalog.insert(Disease::YellowFever, schema);

        assert!(matches!(
            catalog.validate(),
            Err(ValidationError::MalformedColumn { field, .. }) if field == "Sample_type"
        ));
    }

    #[test]
    fn test_json_config_round_trip() {
        let catalog = SchemaCatalog::default_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let back = SchemaCatalog::from_json(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(
            back.schema(Disease::Measles),
            catalog.schema(Disease::Measles)
        );
    }
}
