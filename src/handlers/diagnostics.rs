//! Component diagnostics

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub ml_model_status: &'static str,
    pub tfidf_vectorizer_status: &'static str,
    pub overall_ml_status: &'static str,
    pub overall_ml_components_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectorizer_sha256: Option<String>,
}

fn loaded(flag: bool) -> &'static str {
    if flag { "Loaded" } else { "Not Loaded" }
}

pub async fn components(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let status = state.scans.scorer_status();
    let ready = status.ready();

    Json(DiagnosticsResponse {
        message: "Backend is working!",
        status: "success",
        ml_model_status: loaded(status.model_loaded),
        tfidf_vectorizer_status: loaded(status.vectorizer_loaded),
        overall_ml_status: if ready { "Ready" } else { "Problem with loading components" },
        overall_ml_components_loaded: ready,
        model_sha256: status.model_sha256,
        vectorizer_sha256: status.vectorizer_sha256,
    })
}
