//! Decision pipeline
//!
//! - `normalize`: URL canonicalization for the scorer
//! - `rules`: ordered short-circuit rules
//! - `model`: scoring capability
//! - `risk`: probability -> phishing flag + tier
//! - `scan`: orchestration and persistence

pub mod model;
pub mod normalize;
pub mod risk;
pub mod rules;
pub mod scan;
pub mod verdict;

pub use model::{NoScorer, Scorer, ScorerCapability, ScorerStatus, ScoringError};
pub use risk::{classify, Classification, RiskTier};
pub use rules::RuleEngine;
pub use scan::{ScanDecision, ScanError, ScanResult, ScanService};
pub use verdict::{Verdict, VerdictReason, VerdictSource};
