//! Error handling for the gateway

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use paperview_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authorized")]
    Unauthorized,

    #[error("document key missing")]
    KeyMissing,

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Response bodies stay generic on purpose; internal detail is logged
        // at the call site, never sent. A rejected key and an absent key are
        // indistinguishable to the caller.
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authorized"),
            ApiError::KeyMissing => (StatusCode::BAD_REQUEST, "Document key missing"),
            ApiError::DocumentNotFound(_) => (StatusCode::NOT_FOUND, "Document not found"),
            ApiError::Store(StoreError::NotFound(_) | StoreError::InvalidKey(_)) => {
                (StatusCode::NOT_FOUND, "Document not found")
            }
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
