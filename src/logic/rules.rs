//! URL Rule Engine
//!
//! Ordered policy checks over the raw URL. The first rule that matches
//! decides the verdict; later rules and the model are never consulted.
//! A rule that cannot read the URL simply does not match.

use super::normalize::{self, MalformedUrl};
use super::verdict::{Verdict, VerdictReason};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Confidence reported for trusted domains
pub const TRUSTED_CONFIDENCE: f64 = 0.01;

/// Confidence reported for plain-HTTP URLs
pub const INSECURE_TRANSPORT_CONFIDENCE: f64 = 0.90;

const INSECURE_SCHEME_PREFIX: &str = "http://";

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A named predicate that yields a fixed verdict when it matches
pub trait UrlRule: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, raw_url: &str) -> Result<Option<Verdict>, MalformedUrl>;
}

// ============================================================================
// BUILT-IN RULES
// ============================================================================

/// Trusted domains and their subdomains are never phishing
pub struct TrustedDomainRule {
    domains: Vec<String>,
}

impl TrustedDomainRule {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    pub fn is_trusted(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

impl UrlRule for TrustedDomainRule {
    fn name(&self) -> &str {
        "TrustedDomainRule"
    }

    fn evaluate(&self, raw_url: &str) -> Result<Option<Verdict>, MalformedUrl> {
        let parsed = normalize::parse(raw_url)?;
        if self.is_trusted(parsed.host()) {
            Ok(Some(Verdict::rule(false, TRUSTED_CONFIDENCE, VerdictReason::TrustedDomain)))
        } else {
            Ok(None)
        }
    }
}

/// Unencrypted HTTP is treated as phishing
pub struct InsecureTransportRule;

impl UrlRule for InsecureTransportRule {
    fn name(&self) -> &str {
        "InsecureTransportRule"
    }

    fn evaluate(&self, raw_url: &str) -> Result<Option<Verdict>, MalformedUrl> {
        let candidate = raw_url.trim_start().as_bytes();
        let prefix = INSECURE_SCHEME_PREFIX.as_bytes();
        let matched = candidate.len() >= prefix.len() && candidate[..prefix.len()].eq_ignore_ascii_case(prefix);

        Ok(matched.then(|| {
            Verdict::rule(true, INSECURE_TRANSPORT_CONFIDENCE, VerdictReason::InsecureTransport)
        }))
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RuleEngine {
    rules: Vec<Box<dyn UrlRule>>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Box<dyn UrlRule>>) -> Self {
        Self { rules }
    }

    /// Standard rule order: trusted domains first, then insecure transport
    pub fn standard<I, S>(trusted_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(vec![
            Box::new(TrustedDomainRule::new(trusted_domains)),
            Box::new(InsecureTransportRule),
        ])
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// First matching rule's verdict, if any
    pub fn evaluate(&self, raw_url: &str) -> Option<Verdict> {
        for rule in &self.rules {
            match rule.evaluate(raw_url) {
                Ok(Some(verdict)) => {
                    tracing::debug!("Rule {} matched '{}'", rule.name(), raw_url);
                    return Some(verdict);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!("Rule {} skipped for '{}': {}", rule.name(), raw_url, e);
                }
            }
        }
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::verdict::VerdictSource;

    fn engine() -> RuleEngine {
        RuleEngine::standard(["phishtank.org"])
    }

    #[test]
    fn test_trusted_domain_and_subdomains() {
        let rule = TrustedDomainRule::new(["PhishTank.org."]);
        assert!(rule.is_trusted("phishtank.org"));
        assert!(rule.is_trusted("www.PHISHTANK.org"));
        assert!(rule.is_trusted("a.b.phishtank.org."));
        assert!(!rule.is_trusted("notphishtank.org"));
        assert!(!rule.is_trusted("phishtank.org.evil.test"));
    }

    #[test]
    fn test_whitelist_wins_over_insecure_transport() {
        let verdict = engine().evaluate("http://www.phishtank.org/login").unwrap();
        assert!(!verdict.is_phishing);
        assert_eq!(verdict.confidence, TRUSTED_CONFIDENCE);
        assert_eq!(verdict.reason, VerdictReason::TrustedDomain);
        assert_eq!(verdict.source, VerdictSource::Rule);
    }

    #[test]
    fn test_insecure_transport_is_case_insensitive() {
        for url in ["http://example.com/a/b", "HTTP://example.com", "  Http://x.test"] {
            let verdict = engine().evaluate(url).unwrap();
            assert!(verdict.is_phishing, "{url}");
            assert_eq!(verdict.confidence, INSECURE_TRANSPORT_CONFIDENCE);
            assert_eq!(verdict.reason, VerdictReason::InsecureTransport);
        }
    }

    #[test]
    fn test_no_rule_matches_plain_https() {
        assert!(engine().evaluate("https://example.com/login").is_none());
        assert!(engine().evaluate("httpx://example.com").is_none());
    }

    #[test]
    fn test_malformed_url_skips_whitelist_but_not_later_rules() {
        // Whitelist cannot parse this, insecure transport still applies
        let verdict = engine().evaluate("http://").unwrap();
        assert_eq!(verdict.reason, VerdictReason::InsecureTransport);

        assert!(engine().evaluate("not a url").is_none());
        assert!(engine().evaluate("").is_none());
    }

    struct Always(f64);

    impl UrlRule for Always {
        fn name(&self) -> &str {
            "Always"
        }

        fn evaluate(&self, _raw_url: &str) -> Result<Option<Verdict>, MalformedUrl> {
            Ok(Some(Verdict::rule(true, self.0, VerdictReason::InsecureTransport)))
        }
    }

    struct Broken;

    impl UrlRule for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn evaluate(&self, _raw_url: &str) -> Result<Option<Verdict>, MalformedUrl> {
            Err(MalformedUrl::MissingHost)
        }
    }

    #[test]
    fn test_first_match_short_circuits() {
        let engine = RuleEngine::new(vec![Box::new(Broken), Box::new(Always(0.3)), Box::new(Always(0.8))]);
        assert_eq!(engine.rule_names(), vec!["Broken", "Always", "Always"]);
        assert_eq!(engine.evaluate("anything").unwrap().confidence, 0.3);
    }
}
