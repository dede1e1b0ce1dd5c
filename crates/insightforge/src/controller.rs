//! Research flow controller.
//!
//! [`ResearchState`] holds everything the user sees (view, transcript,
//! notice, complexity mode) and applies analysis and follow-up outcomes to
//! it. [`Controller`] pairs that state with an owned [`AnalysisClient`] for
//! the surfaces that can simply await each call; the TUI instead keeps the
//! state on its thread and hands the client to a worker.

use forge_client::{AnalysisClient, AnalysisError, GeminiClient, Reply};
use forge_core::prompts::{Action, CAPACITY_NOTICE_BODY, CAPACITY_NOTICE_TITLE};
use forge_core::{merge_primary_source, ForgeConfig};
use forge_models::{AnalysisInput, ComplexityMode, DisplayType, Message, ViewState};
use tracing::{info, warn};

use crate::error::Result;
use crate::transcript::{SubmitRejected, Transcript};
use crate::view::{TransitionError, ViewMachine};

/// Dismissible notice shown over the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The first analysis failed; the service is assumed to be over capacity.
    Capacity,
}

impl Notice {
    /// Notice heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::Capacity => CAPACITY_NOTICE_TITLE,
        }
    }

    /// Notice body.
    pub fn body(self) -> &'static str {
        match self {
            Self::Capacity => CAPACITY_NOTICE_BODY,
        }
    }
}

/// User-visible application state.
#[derive(Debug, Default)]
pub struct ResearchState {
    view: ViewMachine,
    transcript: Transcript,
    notice: Option<Notice>,
    mode: ComplexityMode,
    pending: Option<AnalysisInput>,
}

impl ResearchState {
    /// Fresh state on the landing view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the analyzing view for `input`.
    pub fn begin_analysis(&mut self, input: &AnalysisInput) -> std::result::Result<(), TransitionError> {
        self.view.begin(input)?;
        self.notice = None;
        self.pending = Some(input.clone());
        Ok(())
    }

    /// Apply the outcome of the first analysis.
    ///
    /// Success seeds the transcript (URL inputs get their primary source
    /// merged in) and opens the chat. Failure returns to landing with the
    /// capacity notice; the error is handed back for callers that report it.
    pub fn complete_analysis(&mut self, result: std::result::Result<Reply, AnalysisError>) -> Result<()> {
        match result {
            Ok(reply) => {
                self.view.complete()?;
                let sources = match self.pending.take() {
                    Some(input) => merge_primary_source(&input, reply.sources),
                    None => reply.sources,
                };
                info!(sources = sources.len(), "Analysis ready, opening chat");
                self.transcript.seed(reply.text, sources);
                Ok(())
            }
            Err(e) => {
                self.view.fail()?;
                self.pending = None;
                self.notice = Some(Notice::Capacity);
                warn!(error = %e, "Analysis failed, back to landing");
                Err(e.into())
            }
        }
    }

    /// Accept a follow-up for sending.
    pub fn begin_follow_up(
        &mut self,
        text: &str,
        display_type: DisplayType,
    ) -> std::result::Result<(), SubmitRejected> {
        if self.view.state() != ViewState::Chat {
            return Err(SubmitRejected::NotReady);
        }
        self.transcript.begin_turn(text, display_type)
    }

    /// Record the outcome of the outstanding follow-up.
    pub fn finish_follow_up(&mut self, result: std::result::Result<Reply, AnalysisError>) -> &Message {
        if let Err(e) = &result {
            warn!(error = %e, "Follow-up failed");
        }
        self.transcript.finish_turn(result)
    }

    /// Current view.
    pub fn view(&self) -> ViewState {
        self.view.state()
    }

    /// The conversation.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a follow-up reply is outstanding.
    pub fn is_thinking(&self) -> bool {
        self.transcript.is_thinking()
    }

    /// Notice to show, if any.
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Close the notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Source being analyzed.
    pub fn pending_input(&self) -> Option<&AnalysisInput> {
        self.pending.as_ref()
    }

    /// Complexity mode applied to follow-ups.
    pub fn mode(&self) -> ComplexityMode {
        self.mode
    }

    /// Set the complexity mode.
    pub fn set_mode(&mut self, mode: ComplexityMode) {
        self.mode = mode;
    }

    /// Switch to the next complexity mode.
    pub fn cycle_mode(&mut self) -> ComplexityMode {
        self.mode = self.mode.cycle();
        self.mode
    }
}

/// Research state driven by an owned analysis client.
pub struct Controller {
    state: ResearchState,
    client: AnalysisClient,
    config: ForgeConfig,
}

impl Controller {
    /// Create a controller around a client.
    pub fn new(client: AnalysisClient, config: ForgeConfig) -> Self {
        Self {
            state: ResearchState::new(),
            client,
            config,
        }
    }

    /// Create a controller talking to Gemini.
    ///
    /// Fails before any network traffic when no API key is configured.
    pub fn from_config(config: ForgeConfig) -> Result<Self> {
        let provider = GeminiClient::from_config(&config)?;
        let client = AnalysisClient::new(provider, config.model.clone());
        Ok(Self::new(client, config))
    }

    /// Analyze a source and open the chat.
    ///
    /// Takes at least the configured minimum delay for the input kind.
    pub async fn analyze(&mut self, input: AnalysisInput) -> Result<()> {
        self.state.begin_analysis(&input)?;
        let minimum = self.config.minimum_delay(input.is_deep_research());
        let result = self.client.start_analysis_paced(input, minimum).await;
        self.state.complete_analysis(result)
    }

    /// Ask a typed follow-up question.
    pub async fn submit(&mut self, text: &str) -> Result<&Message> {
        self.follow_up(text, DisplayType::Text).await
    }

    /// Run a canned action.
    pub async fn action(&mut self, action: Action) -> Result<&Message> {
        self.follow_up(action.prompt(), action.display_type()).await
    }

    async fn follow_up(&mut self, text: &str, display_type: DisplayType) -> Result<&Message> {
        self.state.begin_follow_up(text, display_type)?;
        let result = self.client.send_follow_up(text, self.state.mode()).await;
        Ok(self.state.finish_follow_up(result))
    }

    /// User-visible state.
    pub fn state(&self) -> &ResearchState {
        &self.state
    }

    /// Mutable user-visible state (mode, notice).
    pub fn state_mut(&mut self) -> &mut ResearchState {
        &mut self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }
}
