//! Application error type and its HTTP rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::store::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors surfaced at the HTTP boundary.
///
/// Every variant renders as `{"error": <message>}` with the matching status
/// code. Server-side failures keep their details in the log; the response
/// body carries only the message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, "request failed: {message}");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            // Duplicate-key signals are handled inside the shortening engine;
            // one reaching this mapping means a store reported it from an
            // operation that cannot collide.
            StoreError::CodeExists | StoreError::UrlExists => {
                AppError::internal("unexpected duplicate entry")
            }
            StoreError::Unavailable(detail) => {
                tracing::error!("store failure: {detail}");
                AppError::internal("store unavailable")
            }
        }
    }
}
