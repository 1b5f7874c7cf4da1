//! Epitriage Core Library
//!
//! Case-classification decision core for infectious disease surveillance
//! forms.
//!
//! # Architecture
//!
//! ```text
//! Form input → Feature Encoder → Classifier → Label Resolver
//!                                                   │
//!                                         Clinical Rule Engine
//!                                                   │
//!                                     final decision (label + class id
//!                                        + fired rule, for audit)
//! ```
//!
//! # Core Principle
//!
//! **A clinical rule that fires replaces the classifier's answer
//! outright.** The model's raw label stays on the decision for audit
//! display; it is never blended with the rule's label.
//!
//! # Modules
//!
//! - [`catalog`]: static per-disease input field declarations
//! - [`models`]: domain types (Disease, RawInput, Decision, etc.)
//! - [`registry`]: per-disease classifier bundles, loaded once
//! - [`pipeline`]: encoder → classifier → label resolver, plus the batch path
//! - [`rules`]: per-disease clinical override rules

pub mod catalog;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod rules;

// Re-export commonly used types
pub use catalog::{SchemaCatalog, ValidationError};
pub use models::{
    CaseLabel, Decision, Disease, FeatureSchema, FieldKind, RawInput, RawValue, RowDecision,
    UnknownDisease,
};
pub use pipeline::{
    encode, ClassLabelTable, DecisionPipeline, EncodePolicy, EncodedVector, EncodingError,
    PipelineError, PipelineResult,
};
pub use registry::{ModelLoadError, ModelRegistry, RegistryEntry};
pub use rules::RuleVerdict;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::str::FromStr;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum EpitriageError {
    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Classification error: {0}")]
    Classification(String),
}

impl From<ModelLoadError> for EpitriageError {
    fn from(e: ModelLoadError) -> Self {
        EpitriageError::ModelLoad(e.to_string())
    }
}

impl From<ValidationError> for EpitriageError {
    fn from(e: ValidationError) -> Self {
        EpitriageError::Validation(e.to_string())
    }
}

impl From<PipelineError> for EpitriageError {
    fn from(e: PipelineError) -> Self {
        EpitriageError::Classification(e.to_string())
    }
}

impl From<UnknownDisease> for EpitriageError {
    fn from(e: UnknownDisease) -> Self {
        EpitriageError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load every disease's model artifact from a directory and build the
/// decision pipeline over the built-in schema catalog.
#[uniffi::export]
pub fn open_pipeline(model_dir: String) -> Result<Arc<EpitriageCore>, EpitriageError> {
    let registry = ModelRegistry::load_dir(&model_dir)?;
    let pipeline = DecisionPipeline::new(registry, SchemaCatalog::default_catalog())?;
    Ok(Arc::new(EpitriageCore { pipeline }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Pipeline wrapper exposed to the form layer. Immutable after
/// construction, so concurrent calls need no locking.
#[derive(uniffi::Object)]
pub struct EpitriageCore {
    pipeline: DecisionPipeline,
}

#[uniffi::export]
impl EpitriageCore {
    /// Diseases available in this build, in form-menu order.
    pub fn diseases(&self) -> Vec<String> {
        Disease::ALL.iter().map(|d| d.name().to_string()).collect()
    }

    /// Field declarations for one disease, in form order, for the form
    /// layer to render as widgets.
    pub fn schema_fields(&self, disease: String) -> Result<Vec<FfiFieldSpec>, EpitriageError> {
        let disease = parse_disease(&disease)?;
        let schema = self
            .pipeline
            .catalog()
            .schema(disease)
            .ok_or_else(|| EpitriageError::Validation(format!("no schema for {disease}")))?;
        Ok(schema
            .iter()
            .map(|(name, kind)| FfiFieldSpec::from_field(name, kind))
            .collect())
    }

    /// Classify one submission.
    pub fn classify(
        &self,
        disease: String,
        fields: Vec<FfiField>,
    ) -> Result<FfiDecision, EpitriageError> {
        let disease = parse_disease(&disease)?;
        let input = raw_input_from_fields(fields)?;
        let decision = self.pipeline.classify(disease, &input)?;
        Ok(decision.into())
    }

    /// Classify many rows; exactly one outcome per row, in input order.
    pub fn classify_batch(
        &self,
        disease: String,
        rows: Vec<FfiRow>,
    ) -> Result<Vec<FfiRowOutcome>, EpitriageError> {
        let disease = parse_disease(&disease)?;
        let inputs = rows
            .into_iter()
            .map(|row| raw_input_from_fields(row.fields))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .pipeline
            .classify_batch(disease, &inputs)
            .into_iter()
            .map(FfiRowOutcome::from_result)
            .collect())
    }
}

fn parse_disease(name: &str) -> Result<Disease, EpitriageError> {
    Ok(Disease::from_str(name)?)
}

fn raw_input_from_fields(fields: Vec<FfiField>) -> Result<RawInput, EpitriageError> {
    let mut input = RawInput::new();
    for field in fields {
        match (field.text, field.number) {
            (Some(text), None) => input.insert(&field.name, text),
            (None, Some(number)) => input.insert(&field.name, number),
            (None, None) => {
                return Err(EpitriageError::InvalidInput(format!(
                    "field {:?} has no value",
                    field.name
                )))
            }
            (Some(_), Some(_)) => {
                return Err(EpitriageError::InvalidInput(format!(
                    "field {:?} has both a text and a number value",
                    field.name
                )))
            }
        }
    }
    Ok(input)
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe field value: exactly one of `text`/`number` must be set.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiField {
    pub name: String,
    pub text: Option<String>,
    pub number: Option<f64>,
}

/// FFI-safe field declaration for widget rendering.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldSpec {
    pub name: String,
    /// "numeric" or "categorical".
    pub kind: String,
    /// Allowed values for categorical fields, empty for numeric ones.
    pub values: Vec<String>,
}

impl FfiFieldSpec {
    fn from_field(name: &str, kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Numeric => Self {
                name: name.to_string(),
                kind: "numeric".to_string(),
                values: Vec::new(),
            },
            FieldKind::Categorical(values) => Self {
                name: name.to_string(),
                kind: "categorical".to_string(),
                values: values.clone(),
            },
        }
    }
}

/// FFI-safe batch row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRow {
    pub fields: Vec<FfiField>,
}

/// FFI-safe decision, carrying the audit triple (final label, raw class
/// id, fired rule) rather than just the final string.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDecision {
    pub decision_id: String,
    pub disease: String,
    pub label: String,
    pub class_id: i64,
    pub model_label: String,
    pub rule_fired: Option<String>,
    pub derived_feature_list: bool,
    pub decided_at: String,
}

impl From<Decision> for FfiDecision {
    fn from(decision: Decision) -> Self {
        Self {
            decision_id: decision.decision_id,
            disease: decision.disease.name().to_string(),
            label: decision.label,
            class_id: decision.class_id,
            model_label: decision.model_label,
            rule_fired: decision.rule_fired,
            derived_feature_list: decision.derived_feature_list,
            decided_at: decision.decided_at,
        }
    }
}

/// FFI-safe batch row outcome: either a label+id or an error message,
/// kept in row order.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRowOutcome {
    pub label: Option<String>,
    pub class_id: Option<i64>,
    pub error: Option<String>,
}

impl FfiRowOutcome {
    fn from_result(result: PipelineResult<RowDecision>) -> Self {
        match result {
            Ok(row) => Self {
                label: Some(row.label),
                class_id: Some(row.class_id),
                error: None,
            },
            Err(e) => Self {
                label: None,
                class_id: None,
                error: Some(e.to_string()),
            },
        }
    }
}
