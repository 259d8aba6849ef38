//! GCP client errors

use thiserror::Error;

/// Errors that can occur when calling Google Cloud APIs
#[derive(Debug, Error)]
pub enum GcpError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error not covered by a more specific variant
    #[error("GCP API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credentials could not be loaded or a token could not be minted
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found (HTTP 404 / NOT_FOUND)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation rejected in the resource's current state (FAILED_PRECONDITION)
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// Concurrent modification or duplicate (ALREADY_EXISTS / ABORTED / 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid request built by the caller
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GcpError {
    /// Whether the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error is a FAILED_PRECONDITION rejection
    pub fn is_failed_precondition(&self) -> bool {
        matches!(self, Self::FailedPrecondition(_))
    }
}
