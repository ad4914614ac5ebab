//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1")
        .execute(state.scans.decision_log().pool())
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Health check could not reach database: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "healthy",
        database,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
