//! Model registry: per-disease classifier bundles.
//!
//! Artifacts load once at startup. A registry either holds a bundle for
//! every disease it was asked to load or fails to construct; there is no
//! partial operation with missing models. Loaded bundles are immutable and
//! shared, so concurrent submissions read them without locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use epitriage_model::{decode_artifact, ArtifactError, Classifier, FeatureListSource, ModelBundle};

use crate::models::Disease;
use crate::pipeline::ClassLabelTable;

/// Registry construction failures. Fatal: the registry never exists in a
/// half-loaded state.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("{disease}: cannot read artifact {}: {source}", path.display())]
    Unreadable {
        disease: Disease,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{disease}: malformed artifact: {source}")]
    Malformed {
        disease: Disease,
        #[source]
        source: ArtifactError,
    },
}

/// One disease's loaded model: the decoded bundle plus its resolved label
/// table.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    bundle: Arc<ModelBundle>,
    label_table: ClassLabelTable,
}

impl RegistryEntry {
    fn new(bundle: ModelBundle) -> Self {
        let label_table = match &bundle.target_map {
            Some(map) => ClassLabelTable::from_target_map(map.clone()),
            None => ClassLabelTable::four_level(),
        };
        Self {
            bundle: Arc::new(bundle),
            label_table,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.bundle.classifier
    }

    /// Ordered column names the classifier expects, when known.
    pub fn expected_features(&self) -> Option<&[String]> {
        self.bundle.expected_features.as_deref()
    }

    /// Where the expected-feature list came from.
    pub fn feature_source(&self) -> FeatureListSource {
        self.bundle.feature_source
    }

    pub fn label_table(&self) -> &ClassLabelTable {
        &self.label_table
    }
}

/// Immutable per-disease model registry.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: HashMap<Disease, RegistryEntry>,
}

impl ModelRegistry {
    /// Load every disease's artifact from `<dir>/<slug>.json`. Any absent
    /// or malformed artifact fails the whole load.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ModelLoadError> {
        let mut entries = HashMap::new();
        for disease in Disease::ALL {
            let path = dir.as_ref().join(format!("{}.json", disease.slug()));
            let json = std::fs::read_to_string(&path).map_err(|source| {
                ModelLoadError::Unreadable {
                    disease,
                    path: path.clone(),
                    source,
                }
            })?;
            let bundle = decode_artifact(&json)
                .map_err(|source| ModelLoadError::Malformed { disease, source })?;
            debug!(%disease, source = ?bundle.feature_source, "loaded classifier artifact");
            entries.insert(disease, RegistryEntry::new(bundle));
        }
        Ok(Self { entries })
    }

    /// Build a registry from already-decoded bundles (in-memory path, used
    /// by tests and embedding hosts). May cover a subset of diseases.
    pub fn from_bundles(bundles: impl IntoIterator<Item = (Disease, ModelBundle)>) -> Self {
        let entries = bundles
            .into_iter()
            .map(|(disease, bundle)| (disease, RegistryEntry::new(bundle)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, disease: Disease) -> Option<&RegistryEntry> {
        self.entries.get(&disease)
    }

    pub fn contains(&self, disease: Disease) -> bool {
        self.entries.contains_key(&disease)
    }

    /// Diseases with a loaded bundle, in form-menu order.
    pub fn diseases(&self) -> Vec<Disease> {
        Disease::ALL
            .into_iter()
            .filter(|d| self.contains(*d))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epitriage_model::LogisticModel;

    fn sample_bundle(target_map: bool) -> ModelBundle {
        let classifier = Classifier::Logistic(LogisticModel {
            classes: vec![0, 1],
            weights: vec![vec![0.0], vec![1.0]],
            intercepts: vec![0.1, 0.0],
            feature_names: Some(vec!["Fever_Yes".into()]),
        });
        let map = target_map.then(|| {
            [(0, "Not a Case".to_string()), (1, "Confirmed Case".to_string())]
                .into_iter()
                .collect()
        });
        ModelBundle::new(classifier, None, map).unwrap()
    }

    #[test]
    fn test_from_bundles_and_lookup() {
        let registry =
            ModelRegistry::from_bundles([(Disease::Measles, sample_bundle(false))]);

        assert!(registry.contains(Disease::Measles));
        assert!(registry.get(Disease::Cholera).is_none());
        assert_eq!(registry.diseases(), vec![Disease::Measles]);
    }

    #[test]
    fn test_label_table_defaults_to_four_level() {
        let registry =
            ModelRegistry::from_bundles([(Disease::Measles, sample_bundle(false))]);
        let entry = registry.get(Disease::Measles).unwrap();
        assert_eq!(entry.label_table().resolve(2), "Probable Case");
    }

    #[test]
    fn test_target_map_wins_over_default_table() {
        let registry =
            ModelRegistry::from_bundles([(Disease::Measles, sample_bundle(true))]);
        let entry = registry.get(Disease::Measles).unwrap();
        assert_eq!(entry.label_table().resolve(1), "Confirmed Case");
        // Ids outside the persisted map fall back to the marked label.
        assert_eq!(entry.label_table().resolve(2), "Unknown Class (2)");
    }

    #[test]
    fn test_feature_source_exposed() {
        let registry =
            ModelRegistry::from_bundles([(Disease::Measles, sample_bundle(false))]);
        let entry = registry.get(Disease::Measles).unwrap();
        assert_eq!(entry.feature_source(), FeatureListSource::Classifier);
        assert_eq!(entry.expected_features().unwrap(), ["Fever_Yes"]);
    }
}
