//! Unified error types for the API service.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Unified error type for the API service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A handler result could not be turned into an envelope.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Startup context could not be built.
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// Prometheus exporter could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while reading a handler result as a mapping.
///
/// These are lookup errors: the wrapped handler broke its contract and the
/// request fails without an envelope.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// A required key is absent from the handler result.
    #[error("handler result is missing required key '{key}'")]
    MissingKey {
        /// The missing key.
        key: &'static str,
    },

    /// A required key is present but holds the wrong kind of value.
    #[error("handler result key '{key}' must be {expected}, found {found}")]
    InvalidKey {
        /// The offending key.
        key: &'static str,
        /// What the key should hold.
        expected: &'static str,
        /// JSON kind actually found.
        found: &'static str,
    },

    /// The handler result did not serialize to a JSON object.
    #[error("handler result must be a mapping, found {found}")]
    NotAMapping {
        /// JSON kind actually found.
        found: &'static str,
    },

    /// The handler result could not be serialized at all.
    #[error("handler result could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Application context startup errors.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The run identifier file could not be read.
    #[error("failed to read run id from {path}: {source}")]
    RunIdRead {
        /// File that was read.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The run identifier file was empty.
    #[error("run id file {path} is empty")]
    EmptyRunId {
        /// File that was read.
        path: PathBuf,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = json!({
            "message": status.canonical_reason().unwrap_or_default(),
            "status-code": status.as_u16(),
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ApiError>;
