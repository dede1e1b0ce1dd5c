//! Chat transcript.
//!
//! An append-only list of messages plus the `thinking` flag that serializes
//! follow-up turns: while a reply is outstanding further submissions are
//! rejected, not queued. Sources inside one model message never repeat a URI.

use forge_client::{AnalysisError, Reply};
use forge_core::dedup_sources;
use forge_core::prompts::DEGRADED_SERVICE_TEXT;
use forge_models::{DisplayType, Message, MessageId, Source};
use thiserror::Error;

/// Why a submission was not accepted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Blank input.
    #[error("message is empty")]
    Empty,

    /// A reply is still outstanding.
    #[error("still waiting for the previous reply")]
    Busy,

    /// No source has been analyzed yet.
    #[error("analyze a source before asking questions")]
    NotReady,
}

/// Ordered conversation shown to the user.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    thinking: bool,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the conversation with the first analysis.
    ///
    /// Replaces whatever was there; the seeded message has the id `init`.
    pub fn seed(&mut self, text: impl Into<String>, sources: Vec<Source>) -> &Message {
        self.messages.clear();
        self.thinking = false;
        self.push(Message::model(text, dedup_sources(sources)).with_id(MessageId::initial()))
    }

    /// Append a user message.
    pub fn append_user(&mut self, text: impl Into<String>, display_type: DisplayType) -> &Message {
        self.push(Message::user(text, display_type))
    }

    /// Append a model message.
    pub fn append_model(&mut self, text: impl Into<String>, sources: Vec<Source>) -> &Message {
        self.push(Message::model(text, dedup_sources(sources)))
    }

    /// Append the degraded-service notice as a model message.
    pub fn append_error(&mut self) -> &Message {
        self.push(Message::model(DEGRADED_SERVICE_TEXT, Vec::new()))
    }

    /// Accept a follow-up: record the user message and start thinking.
    pub fn begin_turn(&mut self, text: &str, display_type: DisplayType) -> Result<(), SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.thinking {
            return Err(SubmitRejected::Busy);
        }
        self.append_user(text, display_type);
        self.thinking = true;
        Ok(())
    }

    /// Record the outcome of the outstanding turn and stop thinking.
    pub fn finish_turn(&mut self, result: Result<Reply, AnalysisError>) -> &Message {
        self.thinking = false;
        match result {
            Ok(reply) => self.append_model(reply.text, reply.sources),
            Err(_) => self.append_error(),
        }
    }

    /// Whether a reply is outstanding.
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Newest message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Newest model message.
    pub fn last_model(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_model())
    }

    /// Newest model message that cited sources.
    pub fn last_sources(&self) -> &[Source] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_model() && !m.sources.is_empty())
            .map(|m| m.sources.as_slice())
            .unwrap_or_default()
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::prompts::FOLLOW_UP_FAILURE_TEXT;
    use forge_models::Role;

    fn reply(text: &str) -> Reply {
        Reply {
            text: text.to_string(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_seed_uses_initial_id() {
        let mut transcript = Transcript::new();
        transcript.append_user("stale", DisplayType::Text);

        let source = Source::new("A", "https://a.com", "a.com");
        let seeded = transcript.seed("Summary", vec![source.clone()]);
        assert!(seeded.id.is_initial());
        assert_eq!(seeded.role, Role::Model);

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last_sources(), &[source]);
    }

    #[test]
    fn test_turn_appends_user_then_model() {
        let mut transcript = Transcript::new();
        transcript.seed("Summary", Vec::new());

        transcript.begin_turn("Why?", DisplayType::Text).unwrap();
        assert!(transcript.is_thinking());
        transcript.finish_turn(Ok(reply("Because.")));

        assert!(!transcript.is_thinking());
        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].text, "Why?");
        assert_eq!(messages[2].text, "Because.");
    }

    #[test]
    fn test_blank_submission_rejected() {
        let mut transcript = Transcript::new();
        assert_eq!(
            transcript.begin_turn("   \n", DisplayType::Text),
            Err(SubmitRejected::Empty)
        );
        assert!(transcript.is_empty());
        assert!(!transcript.is_thinking());
    }

    #[test]
    fn test_rapid_second_submission_rejected() {
        let mut transcript = Transcript::new();
        transcript.seed("Summary", Vec::new());

        transcript.begin_turn("first", DisplayType::Text).unwrap();
        assert_eq!(
            transcript.begin_turn("second", DisplayType::Text),
            Err(SubmitRejected::Busy)
        );
        transcript.finish_turn(Ok(reply("answer")));

        // Exactly one user and one model message were added
        assert_eq!(transcript.len(), 3);
        assert!(transcript.messages().iter().all(|m| m.text != "second"));
    }

    #[test]
    fn test_error_result_appends_notice() {
        let mut transcript = Transcript::new();
        transcript.begin_turn("q", DisplayType::ActionOpposing).unwrap();
        let message = transcript.finish_turn(Err(AnalysisError::SessionNotInitialized));

        assert_eq!(message.role, Role::Model);
        assert!(message.text.starts_with("⚠️ **High Traffic Warning**"));
        assert!(message.sources.is_empty());
        assert_eq!(transcript.messages()[0].display_type, DisplayType::ActionOpposing);
    }

    #[test]
    fn test_fallback_reply_is_single_model_message() {
        let mut transcript = Transcript::new();
        transcript.seed("Summary", Vec::new());
        transcript.begin_turn("q", DisplayType::Text).unwrap();
        transcript.finish_turn(Ok(Reply::fallback()));

        assert_eq!(transcript.len(), 3);
        let last = transcript.last().unwrap();
        assert_eq!(last.text, FOLLOW_UP_FAILURE_TEXT);
        assert!(last.sources.is_empty());
    }

    #[test]
    fn test_repeated_citations_collapse() {
        let first = Source::new("B", "https://b.org/1", "b.org");
        let repeat = Source::new("B again", "https://b.org/1", "b.org");

        let mut transcript = Transcript::new();
        let seeded = transcript.seed("Summary", vec![first.clone(), repeat.clone()]);
        assert_eq!(seeded.sources, vec![first.clone()]);

        transcript.begin_turn("q", DisplayType::Text).unwrap();
        let reply = Reply {
            text: "Answer".to_string(),
            sources: vec![first.clone(), repeat],
        };
        let message = transcript.finish_turn(Ok(reply));
        assert_eq!(message.sources, vec![first]);
    }

    #[test]
    fn test_last_model_skips_user_turns() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_model().is_none());

        transcript.seed("Summary", Vec::new());
        transcript.begin_turn("q", DisplayType::Text).unwrap();
        assert_eq!(transcript.last_model().unwrap().text, "Summary");
    }

    #[test]
    fn test_last_sources_empty_without_citations() {
        let mut transcript = Transcript::new();
        transcript.append_model("no sources", Vec::new());
        assert!(transcript.last_sources().is_empty());
    }
}
