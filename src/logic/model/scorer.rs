//! Artifact-backed scorer
//!
//! Loads the model and vectorizer exports once. Either one may be missing;
//! the capability then reports itself unavailable and the scan pipeline
//! falls back to its heuristic.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use super::linear::LinearModel;
use super::vectorizer::TfidfVectorizer;
use super::{ArtifactError, Scorer, ScorerStatus, ScoringError};

/// A loaded artifact together with where it came from
#[derive(Debug, Clone)]
pub struct Artifact<T> {
    pub value: T,
    pub path: PathBuf,
    pub sha256: String,
}

fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<Artifact<T>, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Artifact {
        value,
        path: path.to_path_buf(),
        sha256: hex::encode(Sha256::digest(&bytes)),
    })
}

fn load_model(path: &Path) -> Result<Artifact<LinearModel>, ArtifactError> {
    let artifact: Artifact<LinearModel> = load_artifact(path)?;
    artifact.value.validate()?;
    Ok(artifact)
}

fn load_vectorizer(path: &Path) -> Result<Artifact<TfidfVectorizer>, ArtifactError> {
    let artifact: Artifact<TfidfVectorizer> = load_artifact(path)?;
    artifact.value.validate()?;
    Ok(artifact)
}

#[derive(Debug, Clone, Default)]
pub struct ScorerCapability {
    model: Option<Artifact<LinearModel>>,
    vectorizer: Option<Artifact<TfidfVectorizer>>,
}

impl ScorerCapability {
    /// Load both artifacts. Never fails; problems are logged and the
    /// affected component is left out.
    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Self {
        let model = match load_model(model_path) {
            Ok(artifact) => {
                tracing::info!(
                    "Loaded ML model: {} ({} features, sha256 {})",
                    model_path.display(),
                    artifact.value.dimension(),
                    artifact.sha256
                );
                Some(artifact)
            }
            Err(e) => {
                tracing::warn!("ML model not loaded, fallback will be used: {}", e);
                None
            }
        };

        let vectorizer = match load_vectorizer(vectorizer_path) {
            Ok(artifact) => {
                tracing::info!(
                    "Loaded TF-IDF vectorizer: {} ({} terms, sha256 {})",
                    vectorizer_path.display(),
                    artifact.value.dimension(),
                    artifact.sha256
                );
                Some(artifact)
            }
            Err(e) => {
                tracing::warn!("TF-IDF vectorizer not loaded, fallback will be used: {}", e);
                None
            }
        };

        let capability = Self { model, vectorizer };
        if let (Some(model), Some(vectorizer)) = (&capability.model, &capability.vectorizer) {
            if model.value.dimension() != vectorizer.value.dimension() {
                tracing::warn!(
                    "Model expects {} features but vectorizer produces {}",
                    model.value.dimension(),
                    vectorizer.value.dimension()
                );
            }
        }
        capability
    }

    /// Build from in-memory parts, validated like loaded artifacts
    pub fn from_parts(
        model: Option<LinearModel>,
        vectorizer: Option<TfidfVectorizer>,
    ) -> Result<Self, ArtifactError> {
        if let Some(model) = &model {
            model.validate()?;
        }
        if let Some(vectorizer) = &vectorizer {
            vectorizer.validate()?;
        }

        Ok(Self {
            model: model.map(|value| Artifact {
                value,
                path: PathBuf::new(),
                sha256: String::new(),
            }),
            vectorizer: vectorizer.map(|value| Artifact {
                value,
                path: PathBuf::new(),
                sha256: String::new(),
            }),
        })
    }
}

impl Scorer for ScorerCapability {
    fn available(&self) -> bool {
        self.model.is_some() && self.vectorizer.is_some()
    }

    fn score(&self, normalized_url: &str) -> Result<f64, ScoringError> {
        let (model, vectorizer) = match (&self.model, &self.vectorizer) {
            (Some(model), Some(vectorizer)) => (&model.value, &vectorizer.value),
            _ => return Err(ScoringError::Unavailable),
        };

        let features = vectorizer.transform(normalized_url);
        let probability = model.predict_proba(&features)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::Failed(format!("probability {} out of range", probability)));
        }
        Ok(probability)
    }

    fn status(&self) -> ScorerStatus {
        ScorerStatus {
            model_loaded: self.model.is_some(),
            vectorizer_loaded: self.vectorizer.is_some(),
            model_sha256: self.model.as_ref().map(|a| a.sha256.clone()),
            vectorizer_sha256: self.vectorizer.as_ref().map(|a| a.sha256.clone()),
        }
    }
}
