use crate::config::ModelSettings;
use crate::core::{fields, BinaryClassifier, ModelError};
use crate::models::{Disease, ModelSummary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading the model files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model file {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("{disease} model at {path} expects {model} features but the endpoint provides {schema}")]
    SchemaMismatch {
        disease: Disease,
        path: PathBuf,
        model: usize,
        schema: usize,
    },

    #[error("model loading task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The pretrained classifiers, one per disease
///
/// Built once at startup and shared read-only between workers.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<Disease, Arc<BinaryClassifier>>,
}

impl ModelRegistry {
    /// Load every disease model described by the settings
    ///
    /// Files are read and parsed concurrently; the first failure aborts the
    /// whole load.
    pub async fn load(settings: &ModelSettings) -> Result<Self, LoadError> {
        let handles: Vec<_> = Disease::ALL
            .into_iter()
            .map(|disease| {
                let path = settings.path_for(disease);
                tokio::task::spawn_blocking(move || {
                    load_classifier(disease, &path).map(|clf| (disease, clf))
                })
            })
            .collect();

        let mut registry = Self::default();
        for handle in handles {
            let (disease, classifier) = handle.await??;
            registry.insert(disease, classifier);
        }

        Ok(registry)
    }

    /// Register a classifier, replacing any previous one for the disease
    pub fn insert(&mut self, disease: Disease, classifier: BinaryClassifier) {
        self.models.insert(disease, Arc::new(classifier));
    }

    pub fn get(&self, disease: Disease) -> Option<Arc<BinaryClassifier>> {
        self.models.get(&disease).cloned()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Loaded models in endpoint order
    pub fn summaries(&self) -> Vec<ModelSummary> {
        Disease::ALL
            .into_iter()
            .filter_map(|disease| {
                self.models.get(&disease).map(|clf| ModelSummary {
                    disease,
                    features: clf.num_features(),
                    trees: clf.num_trees(),
                })
            })
            .collect()
    }
}

/// Read one model file and check it against the disease schema
pub fn load_classifier(disease: Disease, path: &Path) -> Result<BinaryClassifier, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let classifier = BinaryClassifier::from_slice(&bytes).map_err(|source| LoadError::Model {
        path: path.to_path_buf(),
        source,
    })?;

    let schema = fields(disease).len();
    if classifier.num_features() != schema {
        return Err(LoadError::SchemaMismatch {
            disease,
            path: path.to_path_buf(),
            model: classifier.num_features(),
            schema,
        });
    }

    tracing::info!(
        "Loaded {} model from {} ({} trees, {} features, {})",
        disease.label(),
        path.display(),
        classifier.num_trees(),
        classifier.num_features(),
        classifier.objective()
    );

    Ok(classifier)
}
