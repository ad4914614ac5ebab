//! Recent scans handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::stats::invalid_query;
use crate::models::ScanRecord;
use crate::{AppResult, AppState};

/// Most records a single request may return
pub const MAX_RECENT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentResponse {
    pub scans: Vec<ScanRecord>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> AppResult<Json<RecentResponse>> {
    let Query(query) = query.map_err(invalid_query)?;
    let limit = query.limit.unwrap_or(MAX_RECENT).clamp(1, MAX_RECENT);
    let scans = state.scans.decision_log().recent(limit).await?;
    Ok(Json(RecentResponse { scans }))
}
