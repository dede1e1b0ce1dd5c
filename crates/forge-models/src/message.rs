//! Transcript messages and citation sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The language model.
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// How a user message is presented.
///
/// Action requests are canned follow-up prompts; front ends show a banner
/// for them instead of the raw prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    /// A plain typed follow-up.
    #[default]
    Text,
    /// "Make thread" action.
    ActionThread,
    /// "Find opposing views" action.
    ActionOpposing,
}

impl DisplayType {
    /// Whether this is one of the canned action requests.
    pub fn is_action(self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// A web source cited by the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Page title.
    pub title: String,
    /// Page URI.
    pub uri: String,
    /// Display domain (hostname without a leading `www.`).
    pub domain: String,
}

impl Source {
    /// Create a new source.
    pub fn new(title: impl Into<String>, uri: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
            domain: domain.into(),
        }
    }
}

/// A message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for the message.
    pub id: MessageId,

    /// Who produced the message.
    pub role: Role,

    /// Message text (Markdown for model messages).
    pub text: String,

    /// Citations attached to a model message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,

    /// Presentation hint.
    #[serde(default)]
    pub display_type: DisplayType,

    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>, display_type: DisplayType) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            text: text.into(),
            sources: Vec::new(),
            display_type,
            timestamp: Utc::now(),
        }
    }

    /// Creates a model message.
    pub fn model(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Model,
            text: text.into(),
            sources,
            display_type: DisplayType::Text,
            timestamp: Utc::now(),
        }
    }

    /// Replaces the message ID.
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = id;
        self
    }

    /// Whether the message came from the model.
    pub fn is_model(&self) -> bool {
        self.role == Role::Model
    }
}
