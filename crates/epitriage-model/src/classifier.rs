//! Serialized classifier formats and inference.
//!
//! Two exported forms are supported, tagged by `"kind"` in the JSON:
//! - `logistic`: per-class weight rows + intercepts, argmax of scores
//! - `decision_tree`: flattened node arrays, walked from the root
//!
//! Both carry a `classes` list mapping the winning index to the raw class
//! id the label table understands, and optionally the feature names the
//! model was fit on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural problems found when validating a loaded classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier declares no classes")]
    NoClasses,

    #[error("weight row {row} has {got} columns, expected {expected}")]
    RaggedWeights {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("{what} has length {got}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("non-finite value in {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },

    #[error("node {node} references child {child} outside the tree")]
    ChildOutOfRange { node: usize, child: i64 },

    #[error("split node {node} references feature {feature} outside the declared columns")]
    FeatureOutOfRange { node: usize, feature: i64 },
}

/// Failures while running inference for one row.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("input has {got} features, classifier expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("non-finite input value at column {index}")]
    NonFiniteInput { index: usize },

    #[error("tree walk did not reach a leaf (cycle in children arrays)")]
    CyclicTree,
}

pub type PredictResult<T> = Result<T, PredictError>;

/// A trained classifier in one of the supported serialized forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Logistic(LogisticModel),
    DecisionTree(TreeModel),
}

impl Classifier {
    /// Check that the loaded weights are structurally sound.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        match self {
            Classifier::Logistic(m) => m.validate(),
            Classifier::DecisionTree(m) => m.validate(),
        }
    }

    /// Number of feature columns the classifier consumes.
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::Logistic(m) => m.n_features(),
            Classifier::DecisionTree(m) => m.n_features(),
        }
    }

    /// Feature names the model was fit on, when the export includes them.
    pub fn feature_names(&self) -> Option<&[String]> {
        let names = match self {
            Classifier::Logistic(m) => &m.feature_names,
            Classifier::DecisionTree(m) => &m.feature_names,
        };
        names.as_deref()
    }

    /// Predict the raw class id for one aligned feature vector.
    pub fn predict(&self, x: &[f64]) -> PredictResult<i64> {
        if let Some(index) = x.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::NonFiniteInput { index });
        }
        match self {
            Classifier::Logistic(m) => m.predict(x),
            Classifier::DecisionTree(m) => m.predict(x),
        }
    }
}

/// Multinomial logistic model: one weight row and intercept per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Raw class ids, in the same order as `weights`/`intercepts`.
    pub classes: Vec<i64>,
    /// One weight row per class.
    pub weights: Vec<Vec<f64>>,
    /// One intercept per class.
    pub intercepts: Vec<f64>,
    /// Feature names (column order), when the export includes them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticModel {
    fn validate(&self) -> Result<(), ClassifierError> {
        if self.classes.is_empty() {
            return Err(ClassifierError::NoClasses);
        }
        if self.weights.len() != self.classes.len() {
            return Err(ClassifierError::LengthMismatch {
                what: "weights",
                expected: self.classes.len(),
                got: self.weights.len(),
            });
        }
        if self.intercepts.len() != self.classes.len() {
            return Err(ClassifierError::LengthMismatch {
                what: "intercepts",
                expected: self.classes.len(),
                got: self.intercepts.len(),
            });
        }
        let n = self.n_features();
        for (row, w) in self.weights.iter().enumerate() {
            if w.len() != n {
                return Err(ClassifierError::RaggedWeights {
                    row,
                    expected: n,
                    got: w.len(),
                });
            }
            if let Some(index) = w.iter().position(|v| !v.is_finite()) {
                return Err(ClassifierError::NonFinite {
                    what: "weights",
                    index,
                });
            }
        }
        if let Some(index) = self.intercepts.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFinite {
                what: "intercepts",
                index,
            });
        }
        if let Some(names) = &self.feature_names {
            if names.len() != n {
                return Err(ClassifierError::LengthMismatch {
                    what: "feature_names",
                    expected: n,
                    got: names.len(),
                });
            }
        }
        Ok(())
    }

    fn n_features(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    fn predict(&self, x: &[f64]) -> PredictResult<i64> {
        let n = self.n_features();
        if x.len() != n {
            return Err(PredictError::DimensionMismatch {
                expected: n,
                got: x.len(),
            });
        }

        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (i, (w, b)) in self.weights.iter().zip(&self.intercepts).enumerate() {
            let score: f64 = b + w.iter().zip(x).map(|(wi, xi)| wi * xi).sum::<f64>();
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        Ok(self.classes[best])
    }
}

/// Decision tree exported as flattened node arrays.
///
/// Node `i` is a leaf when `children_left[i] < 0`; otherwise the walk
/// descends left when `x[feature[i]] <= threshold[i]` and right otherwise.
/// At the leaf, the class with the highest count in `value[i]` wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeModel {
    /// Raw class ids, indexing the columns of each `value` row.
    pub classes: Vec<i64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts (one row per node).
    pub value: Vec<Vec<f64>>,
    /// Feature names (column order), when the export includes them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl TreeModel {
    fn validate(&self) -> Result<(), ClassifierError> {
        if self.classes.is_empty() {
            return Err(ClassifierError::NoClasses);
        }
        let nodes = self.children_left.len();
        for (what, len) in [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ] {
            if len != nodes {
                return Err(ClassifierError::LengthMismatch {
                    what,
                    expected: nodes,
                    got: len,
                });
            }
        }
        for (node, (&left, &right)) in self
            .children_left
            .iter()
            .zip(&self.children_right)
            .enumerate()
        {
            for child in [left, right] {
                if child >= nodes as i64 {
                    return Err(ClassifierError::ChildOutOfRange { node, child });
                }
            }
            // Split nodes must reference a real feature column.
            if left >= 0 {
                let feature = self.feature[node];
                let within_declared = self
                    .feature_names
                    .as_ref()
                    .map(|names| feature < names.len() as i64)
                    .unwrap_or(true);
                if feature < 0 || !within_declared {
                    return Err(ClassifierError::FeatureOutOfRange { node, feature });
                }
            }
        }
        if let Some(index) = self.threshold.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFinite {
                what: "threshold",
                index,
            });
        }
        for (node, row) in self.value.iter().enumerate() {
            if row.len() != self.classes.len() {
                return Err(ClassifierError::RaggedWeights {
                    row: node,
                    expected: self.classes.len(),
                    got: row.len(),
                });
            }
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features() {
                return Err(ClassifierError::LengthMismatch {
                    what: "feature_names",
                    expected: self.n_features(),
                    got: names.len(),
                });
            }
        }
        Ok(())
    }

    fn n_features(&self) -> usize {
        if let Some(names) = &self.feature_names {
            return names.len();
        }
        // Highest feature index referenced by any split.
        self.feature
            .iter()
            .filter(|&&f| f >= 0)
            .map(|&f| f as usize + 1)
            .max()
            .unwrap_or(0)
    }

    fn predict(&self, x: &[f64]) -> PredictResult<i64> {
        let n = self.n_features();
        if x.len() < n {
            return Err(PredictError::DimensionMismatch {
                expected: n,
                got: x.len(),
            });
        }

        let mut node = 0usize;
        // Any path visits each node at most once; more steps means a cycle.
        for _ in 0..=self.children_left.len() {
            let left = self.children_left[node];
            if left < 0 {
                let row = &self.value[node];
                let best = row
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                return Ok(self.classes[best]);
            }
            let f = self.feature[node] as usize;
            if f >= x.len() {
                return Err(PredictError::DimensionMismatch {
                    expected: f + 1,
                    got: x.len(),
                });
            }
            node = if x[f] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(PredictError::CyclicTree)
    }
}
