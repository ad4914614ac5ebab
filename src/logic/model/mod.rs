//! Model Module - URL scoring capability
//!
//! The orchestrator only sees the [`Scorer`] trait. The artifact-backed
//! implementation loads a fitted TF-IDF vectorizer and a linear model once
//! at startup and is immutable afterwards.

pub mod linear;
pub mod scorer;
pub mod vectorizer;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub use linear::LinearModel;
pub use scorer::ScorerCapability;
pub use vectorizer::{SparseVector, TfidfVectorizer};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure while producing a score
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("scorer unavailable")]
    Unavailable,

    #[error("scoring failed: {0}")]
    Failed(String),
}

/// Failure while loading a model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// Component availability for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScorerStatus {
    pub model_loaded: bool,
    pub vectorizer_loaded: bool,
    pub model_sha256: Option<String>,
    pub vectorizer_sha256: Option<String>,
}

impl ScorerStatus {
    pub fn ready(&self) -> bool {
        self.model_loaded && self.vectorizer_loaded
    }

    /// Names of the components that failed to load
    pub fn missing_components(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.model_loaded {
            missing.push("model");
        }
        if !self.vectorizer_loaded {
            missing.push("vectorizer");
        }
        missing
    }
}

/// Phishing probability for a normalized URL
pub trait Scorer: Send + Sync {
    fn available(&self) -> bool;

    /// Must only be called when [`Scorer::available`] is true
    fn score(&self, normalized_url: &str) -> Result<f64, ScoringError>;

    fn status(&self) -> ScorerStatus;
}

/// Scorer for deployments without model artifacts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScorer;

impl Scorer for NoScorer {
    fn available(&self) -> bool {
        false
    }

    fn score(&self, _normalized_url: &str) -> Result<f64, ScoringError> {
        Err(ScoringError::Unavailable)
    }

    fn status(&self) -> ScorerStatus {
        ScorerStatus::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_components() {
        let status = ScorerStatus { vectorizer_loaded: true, ..Default::default() };
        assert!(!status.ready());
        assert_eq!(status.missing_components(), vec!["model"]);
        assert_eq!(NoScorer.status().missing_components(), vec!["model", "vectorizer"]);
        assert_eq!(NoScorer.score("https://a.test"), Err(ScoringError::Unavailable));
    }
}
