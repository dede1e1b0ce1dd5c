//! Test doubles shared by the application tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use forge_client::{
    AnalysisClient, ContentProvider, GenerateContentRequest, GenerateContentResponse, ProviderError,
};

use crate::clipboard::Clipboard;

/// Provider that replays queued results and records requests.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, ProviderError>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, response: GenerateContentResponse) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn reply_text(self, text: &str) -> Self {
        self.reply(GenerateContentResponse::from_text(text))
    }

    pub fn fail(self, error: ProviderError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Text of the newest turn of every recorded request.
    pub fn sent_texts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.last_turn().map(|c| c.text()).unwrap_or_default())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Wrap into an analysis client, keeping a handle for inspection.
    pub fn into_client(self) -> (AnalysisClient, Arc<Self>) {
        let provider = Arc::new(self);
        let client = AnalysisClient::with_shared_provider(provider.clone(), "test-model");
        (client, provider)
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn generate_content(
        &self,
        _model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Request("no scripted reply".into())))
    }
}

/// Provider error used where the kind does not matter.
pub fn overloaded() -> ProviderError {
    ProviderError::Api {
        status: 503,
        message: "The model is overloaded.".into(),
    }
}

/// Clipboard that records what was copied, or refuses every copy.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
    unavailable: bool,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> crate::error::Result<()> {
        if self.unavailable {
            return Err(arboard::Error::ClipboardNotSupported.into());
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
