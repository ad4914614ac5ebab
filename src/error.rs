//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::handlers::scan::ScanResponse;
use crate::logic::ScanError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Validation errors
    ValidationError(String),

    // Scan was decided but not recorded
    ScanNotRecorded(ScanResponse),

    // Database errors
    DatabaseError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ScanNotRecorded(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Scan result could not be recorded")
            }
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred")
            }
        };

        let body = match &self {
            AppError::ScanNotRecorded(result) => json!({
                "error": error_message,
                "status": status.as_u16(),
                "result": result,
            }),
            _ => json!({
                "error": error_message,
                "status": status.as_u16()
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidInput => AppError::ValidationError("URL is required".to_string()),
            ScanError::PersistenceFailed { decision, source } => {
                tracing::error!("Scan of '{}' not recorded: {}", decision.url, source);
                AppError::ScanNotRecorded(ScanResponse::from(decision))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ValidationError("URL is required".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DatabaseError("disk full".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ScanError::InvalidInput).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
