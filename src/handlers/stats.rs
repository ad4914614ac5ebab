//! Statistics handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DailyStats, ScanStats};
use crate::{AppError, AppResult, AppState};

const DEFAULT_DAILY_DAYS: u32 = 7;
const MAX_DAILY_DAYS: u32 = 90;

#[derive(Debug, Deserialize, Default)]
pub struct StatsQuery {
    /// Only count the last N days; absent or 0 means all time
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DailyStatsResponse {
    pub days: Vec<DailyStats>,
}

/// Totals over the decision log
pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> AppResult<Json<ScanStats>> {
    let Query(query) = query.map_err(invalid_query)?;
    let log = state.scans.decision_log();

    // A window reaching past the earliest representable time counts everything
    let cutoff = query
        .days
        .filter(|d| *d > 0)
        .and_then(|days| Duration::try_days(i64::from(days)))
        .and_then(|window| Utc::now().checked_sub_signed(window));

    let stats = match cutoff {
        Some(cutoff) => log.stats_since(cutoff).await?,
        None => log.stats().await?,
    };
    Ok(Json(stats))
}

/// Per-day counts for the trend chart
pub async fn daily(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> AppResult<Json<DailyStatsResponse>> {
    let Query(query) = query.map_err(invalid_query)?;
    let days = query.days.unwrap_or(DEFAULT_DAILY_DAYS).clamp(1, MAX_DAILY_DAYS);
    let days = state.scans.decision_log().daily(days, Utc::now()).await?;
    Ok(Json(DailyStatsResponse { days }))
}

pub(crate) fn invalid_query(rejection: QueryRejection) -> AppError {
    tracing::debug!("Rejected query string: {}", rejection);
    AppError::ValidationError(format!("Invalid query: {}", rejection.body_text()))
}
