//! Gemini `generateContent` wire types.
//!
//! Request types serialize to the REST shape; response types are lenient
//! (every field optional) because the provider omits empty collections and
//! adds fields freely.

use serde::{Deserialize, Serialize};

/// Role of a user turn.
pub const USER_ROLE: &str = "user";

/// Role of a model turn.
pub const MODEL_ROLE: &str = "model";

/// `generateContent` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System instruction applied to the whole conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Conversation turns, oldest first.
    pub contents: Vec<Content>,

    /// Enabled tools.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

impl GenerateContentRequest {
    /// The newest turn, which carries the message being sent.
    pub fn last_turn(&self) -> Option<&Content> {
        self.contents.last()
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`; absent for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Turn payload.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some(USER_ROLE.to_string()),
            parts,
        }
    }

    /// Create a model turn holding plain text.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some(MODEL_ROLE.to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a system instruction.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }
}

/// A piece of a turn: text or inline binary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// Base64 data with its MIME type.
    InlineData {
        /// The payload.
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an inline data part from already-encoded content.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    /// The text, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::InlineData { .. } => None,
        }
    }
}

/// Inline binary payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the data.
    pub mime_type: String,
    /// Base64-encoded data.
    pub data: String,
}

/// Tool declaration. Only web-search grounding is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Enables Google Search grounding.
    pub google_search: GoogleSearch,
}

impl Tool {
    /// The web-search grounding tool.
    pub fn google_search() -> Self {
        Self::default()
    }
}

/// Empty configuration object for the search tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleSearch {}

/// `generateContent` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// The first candidate.
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Text of the first candidate, or `None` when it is empty.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_candidate()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Response holding a single text candidate.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    role: Some(MODEL_ROLE.to_string()),
                    parts: vec![ResponsePart {
                        text: Some(text.into()),
                    }],
                }),
                grounding_metadata: None,
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }

    /// Attach web grounding chunks `(uri, title)` to the first candidate.
    pub fn with_web_chunks<I, U, T>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = (Option<U>, Option<T>)>,
        U: Into<String>,
        T: Into<String>,
    {
        let grounding_chunks = chunks
            .into_iter()
            .map(|(uri, title)| GroundingChunk {
                web: Some(WebChunk {
                    uri: uri.map(Into::into),
                    title: title.map(Into::into),
                }),
            })
            .collect();
        if let Some(candidate) = self.candidates.first_mut() {
            candidate.grounding_metadata = Some(GroundingMetadata { grounding_chunks });
        }
        self
    }
}

/// A generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<CandidateContent>,

    /// Citation data for search-grounded answers.
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,

    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    /// Producer role.
    #[serde(default)]
    pub role: Option<String>,

    /// Generated parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A generated part; non-text parts are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePart {
    /// Generated text.
    #[serde(default)]
    pub text: Option<String>,
}

/// Grounding metadata of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Sources consulted.
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// A consulted source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web source, if this chunk came from search.
    #[serde(default)]
    pub web: Option<WebChunk>,
}

/// Web source of a grounding chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebChunk {
    /// Page URI.
    #[serde(default)]
    pub uri: Option<String>,

    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
    pub(crate) status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::system("be helpful")),
            contents: vec![Content::user(vec![
                Part::inline_data("application/pdf", "AAAA"),
                Part::text("Analyze this"),
            ])],
            tools: vec![Tool::google_search()],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": {"parts": [{"text": "be helpful"}]},
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"inlineData": {"mimeType": "application/pdf", "data": "AAAA"}},
                        {"text": "Analyze this"}
                    ]
                }],
                "tools": [{"google_search": {}}]
            })
        );
    }

    #[test]
    fn test_response_deserialization_with_grounding() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hello "}, {"text": "world"}]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "webSearchQueries": ["hello"],
                    "groundingChunks": [
                        {"web": {"uri": "https://a.com/x", "title": "A"}},
                        {"retrievedContext": {"uri": "gs://b"}}
                    ]
                }
            }],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello world"));

        let chunks = &response.candidates[0]
            .grounding_metadata
            .as_ref()
            .unwrap()
            .grounding_chunks;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].web.is_none());
    }

    #[test]
    fn test_response_without_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());

        let blank = GenerateContentResponse::from_text("   ");
        assert!(blank.text().is_none());
    }

    #[test]
    fn test_part_roundtrip_untagged() {
        let parts: Vec<Part> = serde_json::from_value(json!([
            {"text": "hi"},
            {"inlineData": {"mimeType": "text/plain", "data": "aGk="}}
        ]))
        .unwrap();
        assert_eq!(parts[0].as_text(), Some("hi"));
        assert_eq!(parts[1], Part::inline_data("text/plain", "aGk="));
    }

    #[test]
    fn test_content_text() {
        let content = Content::user(vec![Part::inline_data("a/b", "x"), Part::text("abc")]);
        assert_eq!(content.text(), "abc");
        assert_eq!(content.role.as_deref(), Some(USER_ROLE));
        assert_eq!(Content::model("m").role.as_deref(), Some(MODEL_ROLE));
    }

    #[test]
    fn test_with_web_chunks_builder() {
        let response = GenerateContentResponse::from_text("x")
            .with_web_chunks([(Some("https://a.com"), Some("A")), (None, Some("B"))]);
        let chunks = &response.candidates[0]
            .grounding_metadata
            .as_ref()
            .unwrap()
            .grounding_chunks;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].web.as_ref().unwrap().uri.is_none());
    }
}
