//! Error types for ssvep-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use ssvep_types::ValidationError;
use thiserror::Error;

/// Message carried by a simulated processing fault
pub const SIMULATED_FAULT: &str = "Simulated processing error";

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend could not be reached. Never raised by the in-memory backend.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the detection service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was rejected before touching any state
    #[error("Invalid frequency data: {0}")]
    Validation(#[from] ValidationError),

    /// Wrong or missing admin key
    #[error("Unauthorized")]
    Unauthorized,

    /// Simulated processing fault. State changes have already been committed.
    #[error("{0}")]
    Fault(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Service error
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error, details) = match &self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Invalid frequency data",
                Some(message.clone()),
            ),
            ApiError::Service(ServiceError::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid frequency data",
                Some(err.to_string()),
            ),
            ApiError::Service(ServiceError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized", None)
            }
            ApiError::Service(ServiceError::Fault(message)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
                Some(message.clone()),
            ),
            ApiError::Service(ServiceError::Storage(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Internal server error",
                Some(err.to_string()),
            ),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
