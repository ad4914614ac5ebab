//! URL Normalizer
//!
//! Turns a raw URL into the key the scorer was trained on:
//! `scheme://authority/first-segment`, without query or fragment.
//! Never fails - anything that cannot be parsed comes back unchanged.

use thiserror::Error;
use url::Url;

/// Raw input that could not be read as a standard web URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedUrl {
    #[error("unparseable URL: {0}")]
    Unparseable(String),

    #[error("URL has no host")]
    MissingHost,
}

/// A URL that has both a scheme and a host
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    inner: Url,
}

impl ParsedUrl {
    /// Lowercased scheme
    pub fn scheme(&self) -> &str {
        self.inner.scheme()
    }

    /// Lowercased host (IDNA-encoded for international names)
    pub fn host(&self) -> &str {
        self.inner.host_str().unwrap_or_default()
    }

    /// `user:pass@host:port`, default ports elided
    pub fn authority(&self) -> String {
        let mut authority = String::new();
        let username = self.inner.username();
        if !username.is_empty() {
            authority.push_str(username);
            if let Some(password) = self.inner.password() {
                authority.push(':');
                authority.push_str(password);
            }
            authority.push('@');
        }
        authority.push_str(self.host());
        if let Some(port) = self.inner.port() {
            authority.push(':');
            authority.push_str(&port.to_string());
        }
        authority
    }

    /// First non-empty path segment, if any
    pub fn first_segment(&self) -> Option<&str> {
        self.inner
            .path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
    }
}

/// Parse a raw string into a [`ParsedUrl`]
pub fn parse(raw: &str) -> Result<ParsedUrl, MalformedUrl> {
    let inner = Url::parse(raw.trim()).map_err(|e| MalformedUrl::Unparseable(e.to_string()))?;

    match inner.host_str() {
        Some(host) if !host.is_empty() => Ok(ParsedUrl { inner }),
        _ => Err(MalformedUrl::MissingHost),
    }
}

/// Canonicalize a URL for the scorer.
///
/// `https://Example.com/in/sports?x=1#top` becomes `https://example.com/in`.
/// Root and empty paths collapse to the bare origin.
pub fn normalize(raw: &str) -> String {
    let parsed = match parse(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Non-standard URL '{}' kept as is: {}", raw, e);
            return raw.to_string();
        }
    };

    let base = format!("{}://{}", parsed.scheme(), parsed.authority());
    let normalized = match parsed.first_segment() {
        Some(segment) => format!("{}/{}", base, segment),
        None => base,
    };

    tracing::trace!("Normalized '{}' -> '{}'", raw, normalized);
    normalized
}
