//! Error types for the application crate.

use forge_client::AnalysisError;
use forge_core::{ConfigError, ResolveError};
use thiserror::Error;

use crate::transcript::SubmitRejected;
use crate::view::TransitionError;

/// Errors surfaced by the front ends.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration is unusable (usually a missing API key).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The source could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The analysis client failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The view cannot make the requested transition.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A follow-up was not accepted.
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),

    /// The background client worker is gone.
    #[error("analysis worker stopped")]
    WorkerStopped,

    /// The clipboard could not be opened or written.
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    /// Line editor failure.
    #[error("line editor error: {0}")]
    Readline(String),

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO failure (terminal, runtime).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rustyline::error::ReadlineError> for AppError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Self::Readline(err.to_string())
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_transparent() {
        let err: AppError = ConfigError::MissingApiKey.into();
        assert!(err.to_string().starts_with("GEMINI_API_KEY is not set"));

        let err: AppError = SubmitRejected::Busy.into();
        assert_eq!(err.to_string(), "still waiting for the previous reply");

        let err: AppError = ResolveError::EmptyUrl.into();
        assert_eq!(err.to_string(), "please enter a URL to analyze");
    }

    #[test]
    fn test_worker_stopped_display() {
        assert_eq!(AppError::WorkerStopped.to_string(), "analysis worker stopped");
    }
}
