//! ARM client errors

use thiserror::Error;

/// Errors that can occur when interacting with the ARM API
#[derive(Debug, Error)]
pub enum ArmError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// ARM returned a non-success response
    #[error("ARM API error: {status} - {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ArmError {
    /// Whether this error is the provider's not-found classification
    /// (HTTP 404 equivalent). The reconciler decides absence through this
    /// predicate, never through string matching.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
