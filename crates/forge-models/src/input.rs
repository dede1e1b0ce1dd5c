//! Analysis request payloads.

use serde::{Deserialize, Serialize};

/// MIME type assumed for file inputs that arrive without one.
pub const DEFAULT_FILE_MIME_TYPE: &str = "application/pdf";

/// Name used in prompts for file inputs that arrive without one.
pub const DEFAULT_FILE_NAME: &str = "Document";

/// A canonical analysis request.
///
/// Built once by the source resolver and consumed by value by the remote
/// analysis client, so it cannot be reused after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisInput {
    /// A web resource to analyze.
    Url {
        /// URL exactly as the user typed it (trimmed).
        value: String,
        /// Cross-reference several related sources instead of one.
        auto_research: bool,
    },
    /// An uploaded document.
    File {
        /// Base64-encoded file content.
        value: String,
        /// MIME type of the content.
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// Original file name.
        #[serde(skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
    },
}

impl AnalysisInput {
    /// Create a URL input.
    pub fn url(value: impl Into<String>, auto_research: bool) -> Self {
        Self::Url {
            value: value.into(),
            auto_research,
        }
    }

    /// Create a file input from already-encoded content.
    pub fn file(
        value: impl Into<String>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self::File {
            value: value.into(),
            mime_type: Some(mime_type.into()),
            file_name: Some(file_name.into()),
        }
    }

    /// Whether deep research was requested. Always false for files.
    pub fn is_deep_research(&self) -> bool {
        match self {
            Self::Url { auto_research, .. } => *auto_research,
            Self::File { .. } => false,
        }
    }

    /// The URL, if this is a URL input.
    pub fn url_value(&self) -> Option<&str> {
        match self {
            Self::Url { value, .. } => Some(value),
            Self::File { .. } => None,
        }
    }

    /// Short human-readable label for status lines.
    pub fn label(&self) -> &str {
        match self {
            Self::Url { value, .. } => value,
            Self::File { file_name, .. } => file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME),
        }
    }
}
