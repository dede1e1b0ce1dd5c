//! Error types for the client crate.

use thiserror::Error;

/// Errors raised by a content provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Whether retrying later could succeed (rate limits, overload).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) => false,
        }
    }
}

/// Errors surfaced by [`crate::AnalysisClient`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The first analysis of a source failed.
    #[error("Failed to analyze the content. It might be too large or inaccessible.")]
    AnalysisFailure(#[source] ProviderError),

    /// A follow-up was sent before any analysis succeeded.
    #[error("chat session not initialized")]
    SessionNotInitialized,
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
