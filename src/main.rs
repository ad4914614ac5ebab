//! Phish Guard server binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phish_guard::logic::{ScanService, Scorer, ScorerCapability};
use phish_guard::models::DecisionLog;
use phish_guard::{config, create_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "phish_guard=debug,tower_http=debug".into());
    if config.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Phish Guard starting ({})...", config.environment);
    tracing::info!("Database: {}", config.database_url);

    // Initialize database pool
    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Load scorer artifacts once; missing ones degrade to fallback mode
    let scorer = ScorerCapability::load(&config.model_path, &config.vectorizer_path);
    let missing = scorer.status().missing_components();
    if missing.is_empty() {
        tracing::info!("ML components ready");
    } else {
        tracing::warn!("⚠️ ML {} failed to load, fallback will be used", missing.join(", "));
    }

    let scans = ScanService::from_config(&config, Arc::new(scorer), DecisionLog::new(pool));

    // Build application state
    let state = AppState {
        scans: Arc::new(scans),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
