use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every variant maps to a stable machine code in the response body so
/// clients can distinguish retryable failures (503) from bad requests (4xx).
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No data provided")]
    MissingData,

    #[error("Context (movie IDs) is required")]
    MissingContext,

    #[error("Model name is required")]
    MissingModel,

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Backend unavailable: {0}")]
    Backend(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingData => (StatusCode::BAD_REQUEST, "MISSING_DATA", self.to_string()),
            AppError::MissingContext => {
                (StatusCode::BAD_REQUEST, "MISSING_CONTEXT", self.to_string())
            }
            AppError::MissingModel => {
                (StatusCode::BAD_REQUEST, "MISSING_MODEL", self.to_string())
            }
            AppError::UnknownModel(_) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_MODEL", self.to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Backend(detail) => {
                tracing::error!(error = %detail, "recommendation backend unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "API_ERROR",
                    "Recommendation service unavailable".to_string(),
                )
            }
            // Internal detail goes to the log, never to the client.
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "error": code,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
