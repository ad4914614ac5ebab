//! Phish Guard
//!
//! URL phishing scan service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         PHISH GUARD                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  HTTP (Axum) ──► ScanService                                 │
//! │                    │                                         │
//! │                    ├─ RuleEngine (whitelist, insecure HTTP)  │
//! │                    ├─ normalize ─► Scorer (TF-IDF + linear)  │
//! │                    ├─ FallbackHeuristic                      │
//! │                    ├─ risk::classify                         │
//! │                    ▼                                         │
//! │               DecisionLog ──► SQLite                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

use logic::ScanService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scans: Arc<ScanService>,
    pub config: Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/", get(handlers::home::index))
        .route("/health", get(handlers::health::check))
        .route("/api/test", get(handlers::diagnostics::components))
        .route("/api/scan-url", post(handlers::scan::scan_url))
        .route("/api/stats", get(handlers::stats::summary))
        .route("/api/stats/daily", get(handlers::stats::daily))
        .route("/api/recent", get(handlers::recent::list))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Exact origins, or prefixes when the entry ends in `*`
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins = origins.to_vec();
    layer.allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        origin
            .to_str()
            .map(|origin| origin_allowed(&origins, origin))
            .unwrap_or(false)
    }))
}

fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|pattern| match pattern.strip_suffix('*') {
        Some(prefix) => origin.starts_with(prefix),
        None => origin == pattern,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_patterns() {
        let allowed = vec![
            "http://localhost:3000".to_string(),
            "chrome-extension://*".to_string(),
        ];
        assert!(origin_allowed(&allowed, "http://localhost:3000"));
        assert!(origin_allowed(&allowed, "chrome-extension://abcdef"));
        assert!(!origin_allowed(&allowed, "http://localhost:3001"));
        assert!(!origin_allowed(&allowed, "https://evil.test"));
    }
}
