//! Fallback heuristic used when the model cannot score

use crate::logic::risk;
use crate::logic::verdict::{Verdict, VerdictReason, VerdictSource};

/// Confidence when the suspicious token is present
pub const TOKEN_PRESENT_CONFIDENCE: f64 = 0.75;

/// Confidence when it is absent
pub const TOKEN_ABSENT_CONFIDENCE: f64 = 0.1;

/// Case-insensitive substring check for one configured token
#[derive(Debug, Clone)]
pub struct FallbackHeuristic {
    token: String,
}

impl FallbackHeuristic {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.trim().to_lowercase(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn evaluate(&self, raw_url: &str) -> Verdict {
        let hit = !self.token.is_empty() && raw_url.to_lowercase().contains(&self.token);
        let (confidence, reason) = if hit {
            (TOKEN_PRESENT_CONFIDENCE, VerdictReason::SuspiciousToken)
        } else {
            (TOKEN_ABSENT_CONFIDENCE, VerdictReason::NoSuspiciousToken)
        };

        Verdict {
            is_phishing: risk::is_phishing(confidence),
            confidence,
            reason,
            source: VerdictSource::Fallback,
        }
    }
}
