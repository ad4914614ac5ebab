//! Verdict Types
//!
//! Transient per-request decision. Not persisted directly; the orchestrator
//! projects it into a scan record.

use serde::{Deserialize, Serialize};

/// Which stage produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictSource {
    Rule,
    Model,
    Fallback,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::Rule => "RULE",
            VerdictSource::Model => "MODEL",
            VerdictSource::Fallback => "FALLBACK",
        }
    }
}

impl std::fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Short machine-usable tag for why a verdict was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    TrustedDomain,
    InsecureTransport,
    ModelScore,
    SuspiciousToken,
    NoSuspiciousToken,
}

impl VerdictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictReason::TrustedDomain => "trusted_domain",
            VerdictReason::InsecureTransport => "insecure_transport",
            VerdictReason::ModelScore => "model_score",
            VerdictReason::SuspiciousToken => "suspicious_token",
            VerdictReason::NoSuspiciousToken => "no_suspicious_token",
        }
    }
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_phishing: bool,
    /// Probability in [0, 1] that the URL is phishing
    pub confidence: f64,
    pub reason: VerdictReason,
    pub source: VerdictSource,
}

impl Verdict {
    pub fn rule(is_phishing: bool, confidence: f64, reason: VerdictReason) -> Self {
        Self {
            is_phishing,
            confidence,
            reason,
            source: VerdictSource::Rule,
        }
    }
}
