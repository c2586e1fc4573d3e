//! Error types for the product API
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for the product API.
#[derive(Error, Debug)]
pub enum AppError {
    /// Identifier absent from the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller input failed a precondition
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unique or primary key violation in the store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connectivity or statement failure in the store
    #[error("Store failure: {0}")]
    Store(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Migration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let message = match self {
            AppError::NotFound(msg)
            | AppError::InvalidRequest(msg)
            | AppError::Conflict(msg) => msg,
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Malformed or out-of-range request bodies are validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the product API.
pub type Result<T> = std::result::Result<T, AppError>;
