//! Scan Orchestrator
//!
//! Runs one scan request end to end:
//!
//! ```text
//! START -> RULE_CHECK --(match)-----------------------------> CLASSIFY
//!              |--(scorer available)--> SCORE_WITH_MODEL ---> CLASSIFY
//!              |--(unavailable / scoring failed)--> FALLBACK -> CLASSIFY
//! CLASSIFY -> PERSIST -> DONE
//! ```
//!
//! Exactly one record is appended per successful scan, holding the URL as
//! submitted. Scoring problems never fail a scan; only persistence does.

pub mod fallback;


use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::{DecisionLog, NewScanRecord};

use super::model::{Scorer, ScorerStatus, ScoringError};
use super::normalize::normalize;
use super::risk::{self, RiskTier, PHISHING_THRESHOLD};
use super::rules::RuleEngine;
use super::verdict::{Verdict, VerdictReason, VerdictSource};

pub use fallback::FallbackHeuristic;

// ============================================================================
// TYPES
// ============================================================================

/// Everything decided about a URL before it is recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanDecision {
    pub url: String,
    pub is_phishing: bool,
    pub confidence: f64,
    pub risk_tier: RiskTier,
    pub source: VerdictSource,
    pub reason: VerdictReason,
    pub message: String,
}

/// A recorded decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub id: i64,
    #[serde(flatten)]
    pub decision: ScanDecision,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("URL is required")]
    InvalidInput,

    /// The decision was made but could not be stored
    #[error("scan decision could not be recorded: {source}")]
    PersistenceFailed {
        decision: ScanDecision,
        #[source]
        source: sqlx::Error,
    },
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ScanService {
    rules: RuleEngine,
    scorer: Arc<dyn Scorer>,
    fallback: FallbackHeuristic,
    log: DecisionLog,
}

impl ScanService {
    pub fn new(
        rules: RuleEngine,
        scorer: Arc<dyn Scorer>,
        fallback: FallbackHeuristic,
        log: DecisionLog,
    ) -> Self {
        Self { rules, scorer, fallback, log }
    }

    /// Standard rules and fallback token from configuration
    pub fn from_config(config: &Config, scorer: Arc<dyn Scorer>, log: DecisionLog) -> Self {
        Self::new(
            RuleEngine::standard(&config.trusted_domains),
            scorer,
            FallbackHeuristic::new(&config.suspicious_token),
            log,
        )
    }

    pub fn decision_log(&self) -> &DecisionLog {
        &self.log
    }

    pub fn scorer_status(&self) -> ScorerStatus {
        self.scorer.status()
    }

    /// Decide without recording anything
    pub fn decide(&self, raw_url: &str) -> Result<ScanDecision, ScanError> {
        if raw_url.trim().is_empty() {
            return Err(ScanError::InvalidInput);
        }

        let (verdict, message) = match self.rules.evaluate(raw_url) {
            Some(verdict) => (verdict, rule_message(verdict.reason)),
            None if self.scorer.available() => self.score_with_model(raw_url),
            None => {
                let missing = self.scorer.status().missing_components().join(", ");
                tracing::info!("ML {} not available for '{}', using fallback", missing, raw_url);
                self.apply_fallback(raw_url, &format!("ML {} unavailable", missing))
            }
        };

        Ok(ScanDecision {
            url: raw_url.to_string(),
            is_phishing: verdict.is_phishing,
            confidence: verdict.confidence,
            risk_tier: RiskTier::from_confidence(verdict.confidence),
            source: verdict.source,
            reason: verdict.reason,
            message,
        })
    }

    /// Decide and append the decision to the log
    pub async fn scan(&self, raw_url: &str) -> Result<ScanResult, ScanError> {
        let decision = self.decide(raw_url)?;

        let record = NewScanRecord {
            url: decision.url.clone(),
            is_phishing: decision.is_phishing,
            confidence: decision.confidence,
            timestamp: Some(Utc::now()),
        };

        match self.log.append(&record).await {
            Ok(id) => {
                tracing::info!(
                    id,
                    url = %decision.url,
                    source = %decision.source,
                    reason = %decision.reason,
                    confidence = decision.confidence,
                    is_phishing = decision.is_phishing,
                    "Scan recorded"
                );
                Ok(ScanResult { id, decision })
            }
            Err(source) => {
                tracing::error!("Failed to record scan of '{}': {}", decision.url, source);
                Err(ScanError::PersistenceFailed { decision, source })
            }
        }
    }

    fn score_with_model(&self, raw_url: &str) -> (Verdict, String) {
        let normalized = normalize(raw_url);
        match self.scorer.score(&normalized) {
            Ok(probability) => {
                let classification = risk::classify(probability);
                tracing::debug!(
                    "ML prediction for '{}' (as '{}'): phishing={}, probability={:.6}",
                    raw_url,
                    normalized,
                    classification.is_phishing,
                    probability
                );
                let verdict = Verdict {
                    is_phishing: classification.is_phishing,
                    confidence: probability,
                    reason: VerdictReason::ModelScore,
                    source: VerdictSource::Model,
                };
                (verdict, model_message(classification.is_phishing))
            }
            Err(e) => {
                tracing::warn!("ML scoring failed for '{}': {}", raw_url, e);
                let detail = match e {
                    ScoringError::Unavailable => "ML scorer unavailable".to_string(),
                    ScoringError::Failed(_) => "ML scoring failed".to_string(),
                };
                self.apply_fallback(raw_url, &detail)
            }
        }
    }

    fn apply_fallback(&self, raw_url: &str, why: &str) -> (Verdict, String) {
        let verdict = self.fallback.evaluate(raw_url);
        (verdict, format!("Fallback: basic check ({})", why))
    }
}

// ============================================================================
// MESSAGES
// ============================================================================

fn rule_message(reason: VerdictReason) -> String {
    match reason {
        VerdictReason::TrustedDomain => "Trusted domain, classified as safe.".to_string(),
        VerdictReason::InsecureTransport => "Detected as phishing due to insecure HTTP.".to_string(),
        other => format!("Matched rule: {}", other),
    }
}

fn model_message(is_phishing: bool) -> String {
    let threshold = PHISHING_THRESHOLD * 100.0;
    if is_phishing {
        format!("Detected as phishing by ML model (probability >= {}%).", threshold)
    } else {
        format!("Classified as safe by ML model (probability < {}%).", threshold)
    }
}
