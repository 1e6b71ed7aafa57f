//! Unified error types for the CRUD services.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Process-level error type (startup, configuration, serving).
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by store operations and request extraction.
///
/// The store never leaves a partial mutation behind when one of these is
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The identifier path segment is not an integer.
    #[error("Invalid ID format")]
    InvalidInput,

    /// A required field is missing or empty, a bounded field is out of
    /// range, or the request body could not be parsed.
    #[error("{0}")]
    Validation(String),

    /// No record carries the requested identifier.
    #[error("{label} not found")]
    NotFound {
        /// Singular resource label, e.g. "Record".
        label: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },

    /// The identifier counter cannot advance past `i64::MAX`.
    #[error("{label} identifiers exhausted")]
    IdsExhausted {
        /// Singular resource label, e.g. "Record".
        label: &'static str,
    },
}

impl StoreError {
    /// Build a validation error from any message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::IdsExhausted { .. } => StatusCode::INSUFFICIENT_STORAGE,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
