//! Remote chat session.

use std::sync::Arc;

use tracing::debug;

use crate::error::ProviderError;
use crate::provider::ContentProvider;
use crate::wire::{Content, GenerateContentRequest, GenerateContentResponse, Part, Tool};

/// A conversation bound to one model, system instruction and tool set.
///
/// Every send replays the accumulated turns. A turn is recorded only once
/// the provider has answered it with text, so the history always alternates
/// user and model turns; a failed or empty answer leaves it as it was.
pub struct ChatSession {
    provider: Arc<dyn ContentProvider>,
    model: String,
    system_instruction: Content,
    tools: Vec<Tool>,
    history: Vec<Content>,
}

impl ChatSession {
    /// Start an empty session with web-search grounding enabled.
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_instruction: Content::system(system_instruction),
            tools: vec![Tool::google_search()],
            history: Vec::new(),
        }
    }

    /// Send a user turn and wait for the model's answer.
    pub async fn send(&mut self, parts: Vec<Part>) -> Result<GenerateContentResponse, ProviderError> {
        let turn = Content::user(parts);
        let mut contents = self.history.clone();
        contents.push(turn.clone());

        let request = GenerateContentRequest {
            system_instruction: Some(self.system_instruction.clone()),
            contents,
            tools: self.tools.clone(),
        };

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            turns = request.contents.len(),
            "Sending chat turn"
        );
        let response = self.provider.generate_content(&self.model, &request).await?;

        match response.text() {
            Some(text) => {
                self.history.push(turn);
                self.history.push(Content::model(text));
            }
            None => debug!("Empty answer, turn not recorded"),
        }
        Ok(response)
    }

    /// Model this session talks to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Recorded turns, oldest first.
    pub fn history(&self) -> &[Content] {
        &self.history
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("turns", &self.history.len())
            .finish()
    }
}
