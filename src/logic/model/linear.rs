//! Linear phishing model (logistic regression over TF-IDF features)

use serde::{Deserialize, Serialize};

use super::vectorizer::SparseVector;
use super::{ArtifactError, ScoringError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearModel {
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.weights.is_empty() {
            return Err(ArtifactError::Invalid("model has no weights".to_string()));
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::Invalid("model has non-finite coefficients".to_string()));
        }
        Ok(())
    }

    /// Probability of the phishing class
    pub fn predict_proba(&self, features: &SparseVector) -> Result<f64, ScoringError> {
        let mut logit = self.intercept;
        for (&index, &value) in features {
            let weight = self.weights.get(index).ok_or_else(|| {
                ScoringError::Failed(format!(
                    "feature {} outside model dimension {}",
                    index,
                    self.weights.len()
                ))
            })?;
            logit += weight * value;
        }

        let probability = sigmoid(logit);
        if !probability.is_finite() {
            return Err(ScoringError::Failed(format!("non-finite logit {}", logit)));
        }
        Ok(probability)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
