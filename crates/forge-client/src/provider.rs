//! Provider boundary.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// A backend able to answer one `generateContent` call.
///
/// The conversation state lives in [`crate::ChatSession`]; providers are
/// stateless and may be shared.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Generate a response for the full conversation in `request`.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;

    /// Provider name for logging.
    fn name(&self) -> &str {
        "provider"
    }
}
