//! Error types for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::backend::BackendId;

/// Failure of a single backend attempt
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{backend} is unavailable: {reason}")]
    Unavailable { backend: BackendId, reason: String },

    #[error("{backend} timed out after {timeout_secs}s")]
    Timeout { backend: BackendId, timeout_secs: u64 },

    #[error("{backend} request failed: {source}")]
    Request {
        backend: BackendId,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} returned {status}: {body}")]
    Status {
        backend: BackendId,
        status: u16,
        body: String,
    },

    #[error("{backend} returned an invalid response: {message}")]
    InvalidResponse { backend: BackendId, message: String },
}

impl BackendError {
    /// Identity of the backend that produced this failure
    pub fn backend(&self) -> BackendId {
        match self {
            BackendError::Unavailable { backend, .. }
            | BackendError::Timeout { backend, .. }
            | BackendError::Request { backend, .. }
            | BackendError::Status { backend, .. }
            | BackendError::InvalidResponse { backend, .. } => *backend,
        }
    }

    /// Map a transport error, separating timeouts from other failures
    pub fn from_reqwest(backend: BackendId, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout {
                backend,
                timeout_secs,
            }
        } else {
            BackendError::Request {
                backend,
                source: err,
            }
        }
    }
}

/// Application-level error surfaced at the HTTP boundary
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Backend not registered: {0}")]
    BackendNotFound(BackendId),

    #[error("Invalid priority list: {0}")]
    InvalidPriority(String),

    #[error("All LLM providers failed. Last error: {}", last_failure(.failures))]
    AllBackendsFailed { failures: Vec<BackendError> },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn last_failure(failures: &[BackendError]) -> String {
    failures
        .last()
        .map(ToString::to_string)
        .unwrap_or_else(|| "no enabled providers".to_string())
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AllBackendsFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::BackendNotFound(_)
            | AppError::InvalidPriority(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
