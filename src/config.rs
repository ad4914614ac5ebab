//! Configuration module

use std::env;
use std::path::PathBuf;

/// Default decision log file; integer-millisecond timestamps, not shared
/// with older text-timestamp databases
pub const DEFAULT_DATABASE_URL: &str = "sqlite://phish_guard.db";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Max pooled database connections
    pub db_max_connections: u32,

    /// Server port
    pub port: u16,

    /// Trained model artifact
    pub model_path: PathBuf,

    /// Fitted TF-IDF vectorizer artifact
    pub vectorizer_path: PathBuf,

    /// Domains (and their subdomains) that are never flagged
    pub trusted_domains: Vec<String>,

    /// Token checked by the fallback heuristic when the model is unavailable
    pub suspicious_token: String,

    /// Allowed CORS origins, entries ending in `*` match by prefix
    pub cors_allowed_origins: Vec<String>,

    /// Environment (development, production)
    pub environment: String,

    /// `json` for structured log lines, anything else for the pretty formatter
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/model.json".to_string())
                .into(),

            vectorizer_path: env::var("VECTORIZER_PATH")
                .unwrap_or_else(|_| "models/vectorizer.json".to_string())
                .into(),

            trusted_domains: env::var("TRUSTED_DOMAINS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec!["phishtank.org".to_string()]),

            suspicious_token: env::var("SUSPICIOUS_TOKEN")
                .unwrap_or_else(|_| "login-update-secure".to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec![
                    "http://localhost:3000".to_string(),
                    "chrome-extension://*".to_string(),
                ]),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string()),
        }
    }

    /// Check if log output should be JSON
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            port: 5000,
            model_path: "models/model.json".into(),
            vectorizer_path: "models/vectorizer.json".into(),
            trusted_domains: vec!["phishtank.org".to_string()],
            suspicious_token: "login-update-secure".to_string(),
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "chrome-extension://*".to_string(),
            ],
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Split a comma separated list, dropping blanks
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
