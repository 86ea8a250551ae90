//! Error types for the vROps client

use thiserror::Error;

/// Errors that can occur when talking to the vROps suite API
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// API returned an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body returned alongside the status
        message: String,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status code, when the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
