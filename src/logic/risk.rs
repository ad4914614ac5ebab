//! Risk Classifier
//!
//! Maps a phishing probability to the phishing flag and a display tier.
//! The tier only looks at the number, so a safe verdict at 0.45 still
//! reads MEDIUM.

use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// At or above this probability = phishing
pub const PHISHING_THRESHOLD: f64 = 0.5;

/// Above this = HIGH
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Above this = MEDIUM
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

// ============================================================================
// TYPES
// ============================================================================

/// Coarse risk bucket, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if confidence > MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub is_phishing: bool,
    pub risk_tier: RiskTier,
}

// ============================================================================
// CLASSIFY
// ============================================================================

pub fn is_phishing(confidence: f64) -> bool {
    confidence >= PHISHING_THRESHOLD
}

pub fn classify(confidence: f64) -> Classification {
    Classification {
        is_phishing: is_phishing(confidence),
        risk_tier: RiskTier::from_confidence(confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phishing_threshold_is_inclusive() {
        assert!(!classify(0.4999).is_phishing);
        assert!(classify(0.5).is_phishing);
        assert!(classify(1.0).is_phishing);
        assert!(!classify(0.0).is_phishing);
    }

    #[test]
    fn test_tier_boundaries_are_exclusive_below() {
        assert_eq!(classify(0.4).risk_tier, RiskTier::Low);
        assert_eq!(classify(0.41).risk_tier, RiskTier::Medium);
        assert_eq!(classify(0.7).risk_tier, RiskTier::Medium);
        assert_eq!(classify(0.71).risk_tier, RiskTier::High);
    }

    #[test]
    fn test_tier_is_independent_of_flag() {
        let result = classify(0.45);
        assert!(!result.is_phishing);
        assert_eq!(result.risk_tier, RiskTier::Medium);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let samples: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
        for pair in samples.windows(2) {
            assert!(RiskTier::from_confidence(pair[0]) <= RiskTier::from_confidence(pair[1]));
        }
    }

    #[test]
    fn test_tier_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskTier::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!(RiskTier::High.to_string(), "HIGH");
    }
}
