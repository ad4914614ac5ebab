//! Scan handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::logic::{RiskTier, ScanDecision};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(required(message = "URL is required"), length(min = 1, message = "URL is required"))]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub url: String,
    pub is_phishing: bool,
    pub confidence: f64,
    pub risk_level: RiskTier,
    pub message: String,
}

impl From<ScanDecision> for ScanResponse {
    fn from(decision: ScanDecision) -> Self {
        Self {
            url: decision.url,
            is_phishing: decision.is_phishing,
            confidence: decision.confidence,
            risk_level: decision.risk_tier,
            message: decision.message,
        }
    }
}

/// Scan a URL and record the decision
pub async fn scan_url(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> AppResult<Json<ScanResponse>> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!("Rejected scan body: {}", e);
        AppError::ValidationError("URL is required".to_string())
    })?;

    req.validate()
        .map_err(|_| AppError::ValidationError("URL is required".to_string()))?;

    let url = req.url.unwrap_or_default();
    let result = state.scans.scan(&url).await?;

    Ok(Json(ScanResponse::from(result.decision)))
}
