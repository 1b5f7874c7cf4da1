//! The per-submission decision pipeline.
//!
//! Pipeline: raw input → Feature Encoder → Classifier → Label Resolver →
//! Clinical Rule Engine. A rule verdict replaces the model's label
//! outright; the model's own answer stays on the decision for audit.

mod batch;
mod encoder;
mod labels;

pub use encoder::*;
pub use labels::*;

use thiserror::Error;
use tracing::{debug, warn};

use epitriage_model::PredictError;

use crate::catalog::{SchemaCatalog, ValidationError};
use crate::models::{one_hot_column, Decision, Disease, FeatureSchema, FieldKind, RawInput};
use crate::registry::ModelRegistry;
use crate::rules::{self, RuleVerdict};

/// Per-submission failures. Contained to the submission that produced
/// them; the registry and catalog stay untouched and the next submission
/// starts clean.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no model loaded for {0}")]
    ModelMissing(Disease),

    #[error("no schema declared for {0}")]
    SchemaMissing(Disease),

    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("prediction failed for {disease}: {source}")]
    Prediction {
        disease: Disease,
        #[source]
        source: PredictError,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Decision pipeline over a loaded registry and a validated catalog.
pub struct DecisionPipeline {
    registry: ModelRegistry,
    catalog: SchemaCatalog,
    policy: EncodePolicy,
}

impl DecisionPipeline {
    /// Build a pipeline with the default encode policy. The catalog is
    /// validated against the rule engine before anything is accepted.
    pub fn new(registry: ModelRegistry, catalog: SchemaCatalog) -> Result<Self, ValidationError> {
        Self::with_policy(registry, catalog, EncodePolicy::default())
    }

    pub fn with_policy(
        registry: ModelRegistry,
        catalog: SchemaCatalog,
        policy: EncodePolicy,
    ) -> Result<Self, ValidationError> {
        catalog.validate()?;
        Ok(Self {
            registry,
            catalog,
            policy,
        })
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Classify one submission.
    pub fn classify(&self, disease: Disease, input: &RawInput) -> PipelineResult<Decision> {
        let (vector, derived) = self.encode_for(disease, input)?;
        let class_id = self.predict(disease, &vector)?;
        let model_label = self.label_for(disease, class_id)?;

        let verdict = rules::evaluate(disease, input);
        let (label, rule_fired) = match &verdict {
            RuleVerdict::Override { label, rule } => {
                debug!(%disease, %rule, "clinical rule override");
                (label.to_string(), Some((*rule).to_string()))
            }
            RuleVerdict::Defer => (model_label.clone(), None),
        };

        Ok(Decision {
            decision_id: uuid::Uuid::new_v4().to_string(),
            disease,
            label,
            class_id,
            model_label,
            rule_fired,
            derived_feature_list: derived,
            decided_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Encode one submission, deriving an expected-column list from the
    /// schema + submission when the bundle has none. Returns the vector
    /// and whether the derivation fallback was taken.
    fn encode_for(
        &self,
        disease: Disease,
        input: &RawInput,
    ) -> PipelineResult<(EncodedVector, bool)> {
        let entry = self
            .registry
            .get(disease)
            .ok_or(PipelineError::ModelMissing(disease))?;
        let schema = self
            .catalog
            .schema(disease)
            .ok_or(PipelineError::SchemaMissing(disease))?;

        match entry.expected_features() {
            Some(expected) => {
                let vector = encode(input, schema, expected, self.policy)?;
                Ok((vector, false))
            }
            None => {
                // Last-resort fallback: unsafe for one-hot classifiers,
                // hence the warning and the flag on the decision.
                warn!(%disease, "no expected-feature list; deriving columns from the submission");
                let expected = derive_expected(schema, input);
                let vector = encode(input, schema, &expected, self.policy)?;
                Ok((vector, true))
            }
        }
    }

    fn predict(&self, disease: Disease, vector: &EncodedVector) -> PipelineResult<i64> {
        let entry = self
            .registry
            .get(disease)
            .ok_or(PipelineError::ModelMissing(disease))?;
        entry
            .classifier()
            .predict(vector.values())
            .map_err(|source| PipelineError::Prediction { disease, source })
    }

    fn label_for(&self, disease: Disease, class_id: i64) -> PipelineResult<String> {
        let entry = self
            .registry
            .get(disease)
            .ok_or(PipelineError::ModelMissing(disease))?;
        Ok(entry.label_table().resolve(class_id))
    }
}

/// Derive an expected-column list from the schema and the submitted
/// values: every numeric field, plus one one-hot column per submitted
/// categorical value, in schema order.
fn derive_expected(schema: &FeatureSchema, input: &RawInput) -> Vec<String> {
    let mut columns = Vec::new();
    for (field, kind) in schema.iter() {
        match kind {
            FieldKind::Numeric => columns.push(field.to_string()),
            FieldKind::Categorical(_) => {
                if let Some(value) = input.get(field) {
                    columns.push(one_hot_column(field, &value.category_token()));
                }
            }
        }
    }
    columns
}
