//! Analysis client.
//!
//! Owns at most one [`ChatSession`]. [`AnalysisClient::start_analysis`]
//! replaces it with a fresh session seeded by the source under analysis;
//! [`AnalysisClient::send_follow_up`] continues it.
//!
//! The two calls fail differently: a failed start is an error the caller
//! must surface, a failed follow-up degrades to a canned reply.

use std::sync::Arc;
use std::time::Duration;

use forge_core::prompts::{
    file_prompt, steer, url_prompt, EMPTY_ANALYSIS_TEXT, EMPTY_REPLY_TEXT, FOLLOW_UP_FAILURE_TEXT,
    SYSTEM_INSTRUCTION,
};
use forge_models::input::{DEFAULT_FILE_MIME_TYPE, DEFAULT_FILE_NAME};
use forge_models::{AnalysisInput, ComplexityMode, Source};
use tracing::{error, info, warn};

use crate::citations::extract_sources;
use crate::error::{AnalysisError, Result};
use crate::provider::ContentProvider;
use crate::session::ChatSession;
use crate::wire::Part;

/// Model answer with the sources it cited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Markdown answer.
    pub text: String,
    /// Cited sources, provider order.
    pub sources: Vec<Source>,
}

impl Reply {
    /// Reply standing in for a failed follow-up.
    pub fn fallback() -> Self {
        Self {
            text: FOLLOW_UP_FAILURE_TEXT.to_string(),
            sources: Vec::new(),
        }
    }

    /// Whether this is the canned failure reply.
    pub fn is_fallback(&self) -> bool {
        self.text == FOLLOW_UP_FAILURE_TEXT && self.sources.is_empty()
    }
}

/// Client for source analysis and follow-up questions.
pub struct AnalysisClient {
    provider: Arc<dyn ContentProvider>,
    model: String,
    system_instruction: String,
    session: Option<ChatSession>,
}

impl AnalysisClient {
    /// Create a client for `model` backed by `provider`.
    pub fn new<P: ContentProvider + 'static>(provider: P, model: impl Into<String>) -> Self {
        Self::with_shared_provider(Arc::new(provider), model)
    }

    /// Create a client over an already shared provider.
    pub fn with_shared_provider(provider: Arc<dyn ContentProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            session: None,
        }
    }

    /// Override the system instruction for future sessions.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Whether a session exists for follow-ups.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Model used for new sessions.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze a source in a brand new session.
    ///
    /// The previous session is discarded either way; the new one is kept
    /// only when the provider answers.
    pub async fn start_analysis(&mut self, input: AnalysisInput) -> Result<Reply> {
        self.session = None;
        let mut session = ChatSession::new(
            Arc::clone(&self.provider),
            self.model.clone(),
            self.system_instruction.clone(),
        );

        info!(
            source = input.label(),
            deep_research = input.is_deep_research(),
            "Starting analysis"
        );

        let response = session.send(initial_parts(input)).await.map_err(|e| {
            error!(error = %e, transient = e.is_transient(), "Analysis failed");
            AnalysisError::AnalysisFailure(e)
        })?;

        let reply = Reply {
            text: response.text().unwrap_or_else(|| EMPTY_ANALYSIS_TEXT.to_string()),
            sources: extract_sources(&response),
        };
        info!(sources = reply.sources.len(), "Analysis complete");

        self.session = Some(session);
        Ok(reply)
    }

    /// [`start_analysis`](Self::start_analysis), taking at least `minimum`.
    ///
    /// The call and the delay run concurrently; the outcome is reported once
    /// both have finished.
    pub async fn start_analysis_paced(
        &mut self,
        input: AnalysisInput,
        minimum: Duration,
    ) -> Result<Reply> {
        let (result, ()) = tokio::join!(self.start_analysis(input), tokio::time::sleep(minimum));
        result
    }

    /// Ask a follow-up question in the current session.
    ///
    /// Provider failures produce [`Reply::fallback`] instead of an error;
    /// only a missing session is reported.
    pub async fn send_follow_up(&mut self, text: &str, mode: ComplexityMode) -> Result<Reply> {
        let session = self
            .session
            .as_mut()
            .ok_or(AnalysisError::SessionNotInitialized)?;

        let prompt = steer(text, mode);
        match session.send(vec![Part::text(prompt)]).await {
            Ok(response) => Ok(Reply {
                text: response.text().unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string()),
                sources: extract_sources(&response),
            }),
            Err(e) => {
                warn!(error = %e, %mode, "Follow-up failed, using fallback reply");
                Ok(Reply::fallback())
            }
        }
    }
}

/// Opening turn for an analysis: the file content ahead of its prompt, or
/// the URL prompt alone.
fn initial_parts(input: AnalysisInput) -> Vec<Part> {
    match input {
        AnalysisInput::Url {
            value,
            auto_research,
        } => vec![Part::text(url_prompt(&value, auto_research))],
        AnalysisInput::File {
            value,
            mime_type,
            file_name,
        } => {
            let mime_type = mime_type.unwrap_or_else(|| DEFAULT_FILE_MIME_TYPE.to_string());
            let file_name = file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
            vec![
                Part::inline_data(mime_type, value),
                Part::text(file_prompt(&file_name)),
            ]
        }
    }
}

impl std::fmt::Debug for AnalysisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("session", &self.session)
            .finish()
    }
}
