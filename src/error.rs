// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::ModelError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    // 500 Internal Server Error
    #[error("internal server error: {0}")]
    InternalServerError(String),

    // 400 Bad Request
    #[error("bad request: {0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("unauthorized: {0}")]
    AuthError(String),

    // 404 Not Found
    #[error("not found: {0}")]
    NotFound(String),

    // 409 Conflict (e.g., duplicate vote)
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Converts the error into a JSON response with appropriate HTTP status code.
/// Internal details are logged, never sent to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::InvalidPageRange | ModelError::InvalidPageSize => {
                AppError::BadRequest(message)
            }
            ModelError::DuplicateVote | ModelError::DuplicateTitle | ModelError::DuplicateEmail => {
                AppError::Conflict(message)
            }
            ModelError::NotFound => AppError::NotFound(message),
            ModelError::Store(_) => AppError::InternalServerError(message),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
