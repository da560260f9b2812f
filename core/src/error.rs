//! Errors returned by `TaskboardClient` build and parse methods.
//!
//! `NotFound` gets its own variant because only the get-by-id endpoints
//! answer 404, and callers branch on it. Every other unexpected status lands
//! in `Http` with the server's error message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server answered a status the endpoint does not use for success.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Deserialization(_) | ApiError::Serialization(_) => None,
        }
    }
}
