//! Artifact decoding.
//!
//! Exported artifacts arrive in one of three shapes, depending on which
//! training pipeline produced them:
//! 1. a bare classifier object,
//! 2. an array whose first element is the classifier (trailing elements
//!    are opaque export metadata),
//! 3. an object with `"model"`, optional `"features"` and optional
//!    `"target_map"` keys.
//!
//! The shape is detected once here and normalized into a [`ModelBundle`];
//! nothing downstream ever inspects the raw JSON again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::classifier::{Classifier, ClassifierError};

/// Artifact decoding failures.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact is an empty array")]
    EmptyArtifact,

    #[error("unsupported artifact shape: {0}")]
    UnsupportedShape(String),

    #[error("target_map key {0:?} is not an integer class id")]
    BadTargetMap(String),

    #[error("invalid classifier: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Where a bundle's expected-feature list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureListSource {
    /// The artifact carried an explicit feature list.
    Artifact,
    /// Taken from the classifier's own `feature_names`.
    Classifier,
    /// Neither source had one; callers must derive a list per submission.
    Absent,
}

/// Canonical decoded artifact: classifier plus inference metadata.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub classifier: Classifier,
    /// Ordered column names the classifier was fit on, when known.
    pub expected_features: Option<Vec<String>>,
    pub feature_source: FeatureListSource,
    /// Class id -> label map persisted with the model, when present.
    pub target_map: Option<BTreeMap<i64, String>>,
}

impl ModelBundle {
    /// Build a bundle, validating the classifier and resolving the
    /// expected-feature list (artifact list first, classifier's own
    /// feature names second).
    pub fn new(
        classifier: Classifier,
        features: Option<Vec<String>>,
        target_map: Option<BTreeMap<i64, String>>,
    ) -> Result<Self, ArtifactError> {
        classifier.validate()?;
        let (expected_features, feature_source) = match features {
            Some(list) => (Some(list), FeatureListSource::Artifact),
            None => match classifier.feature_names() {
                Some(names) => (Some(names.to_vec()), FeatureListSource::Classifier),
                None => (None, FeatureListSource::Absent),
            },
        };
        Ok(Self {
            classifier,
            expected_features,
            feature_source,
            target_map,
        })
    }
}

/// Keyed artifact shape (shape 3).
#[derive(Debug, Deserialize)]
struct KeyedArtifact {
    model: Classifier,
    #[serde(default)]
    features: Option<Vec<String>>,
    #[serde(default)]
    target_map: Option<BTreeMap<String, String>>,
}

/// Decode one artifact document into a canonical bundle.
pub fn decode_artifact(json: &str) -> Result<ModelBundle, ArtifactError> {
    let value: Value = serde_json::from_str(json)?;
    decode_value(value)
}

/// Decode an already-parsed artifact value.
pub fn decode_value(value: Value) -> Result<ModelBundle, ArtifactError> {
    match value {
        Value::Array(items) => {
            let first = items.into_iter().next().ok_or(ArtifactError::EmptyArtifact)?;
            let classifier: Classifier = serde_json::from_value(first)?;
            ModelBundle::new(classifier, None, None)
        }
        Value::Object(map) if map.contains_key("model") => {
            let keyed: KeyedArtifact = serde_json::from_value(Value::Object(map))?;
            let target_map = keyed.target_map.map(parse_target_map).transpose()?;
            ModelBundle::new(keyed.model, keyed.features, target_map)
        }
        value @ Value::Object(_) => {
            let classifier: Classifier = serde_json::from_value(value)?;
            ModelBundle::new(classifier, None, None)
        }
        other => Err(ArtifactError::UnsupportedShape(json_type_name(&other).into())),
    }
}

/// Parse the string-keyed target map persisted with trained models.
fn parse_target_map(raw: BTreeMap<String, String>) -> Result<BTreeMap<i64, String>, ArtifactError> {
    let mut map = BTreeMap::new();
    for (key, label) in raw {
        let id: i64 = key
            .trim()
            .parse()
            .map_err(|_| ArtifactError::BadTargetMap(key))?;
        map.insert(id, label);
    }
    Ok(map)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
