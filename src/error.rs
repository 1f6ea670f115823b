//! Error types for quick-blog
//!
//! This module provides the error taxonomy for the library:
//! - [`FetchError`] for everything that can go wrong talking to the article source
//! - [`PersistenceError`] for the snapshot port
//! - [`SearchError`] for faults inside filter evaluation (recovered inside the store)
//! - HTTP status code mapping and structured JSON bodies for the API

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for quick-blog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quick-blog
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "view.page_size")
        key: Option<String>,
    },

    /// Fetching from the article source failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Requested article is absent from the store and the upstream source
    #[error("article not found: {0}")]
    NotFound(String),

    /// Snapshot persistence failed
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Errors returned by the article fetcher
///
/// These are caller-visible: the fetcher never retries on its own and never
/// touches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured time budget
    #[error("request timed out after {}s", .after.as_secs())]
    Timeout {
        /// The budget that was exceeded
        after: Duration,
    },

    /// The article source answered with a non-success status
    #[error("upstream returned {status} {status_text}")]
    UpstreamError {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
    },

    /// Single-article lookup returned 404
    #[error("article {id} not found upstream")]
    NotFound {
        /// The article id that was requested
        id: i64,
    },

    /// The response body could not be decoded as article records
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// Transport-level failure (DNS, connect, reset)
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Whether a UI should offer a retry control for this failure
    pub fn offers_retry(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout { .. } | FetchError::UpstreamError { .. } | FetchError::Network(_)
        )
    }
}

/// Snapshot persistence errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Failed to open the snapshot database
    #[error("failed to open snapshot store: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// Faults raised while evaluating a search
///
/// Never propagated to callers: the store logs them and falls back to the
/// unfiltered collection.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The article collection lock was poisoned by a panicking writer
    #[error("article collection is unavailable: lock poisoned")]
    Poisoned,
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "timeout",
///     "message": "fetch error: request timed out after 10s",
///     "details": { "retryable": true }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "timeout")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 400,

            Error::NotFound(_) => 404,
            Error::Fetch(FetchError::NotFound { .. }) => 404,

            // 502/504 - the article source misbehaved
            Error::Fetch(FetchError::Timeout { .. }) => 504,
            Error::Fetch(FetchError::UpstreamError { .. }) => 502,
            Error::Fetch(FetchError::Decode(_)) => 502,
            Error::Fetch(FetchError::Network(_)) => 502,

            Error::Persistence(_) => 500,
            Error::Sqlx(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Fetch(e) => match e {
                FetchError::Timeout { .. } => "timeout",
                FetchError::UpstreamError { .. } => "upstream_error",
                FetchError::NotFound { .. } => "not_found",
                FetchError::Decode(_) => "decode_error",
                FetchError::Network(_) => "network_error",
            },
            Error::NotFound(_) => "not_found",
            Error::Persistence(_) => "persistence_error",
            Error::Sqlx(_) => "database_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Fetch(FetchError::UpstreamError {
                status,
                status_text,
            }) => Some(serde_json::json!({
                "retryable": true,
                "upstream_status": status,
                "upstream_status_text": status_text,
            })),
            Error::Fetch(FetchError::NotFound { id }) => Some(serde_json::json!({
                "article_id": id,
            })),
            Error::Fetch(e) if e.offers_retry() => Some(serde_json::json!({
                "retryable": true,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
