//! Gemini REST client.
//!
//! Implements [`ContentProvider`] over the `models/{model}:generateContent`
//! endpoint. The API key travels in the `x-goog-api-key` header.

use async_trait::async_trait;
use forge_core::config::{DEFAULT_API_BASE, TIMEOUT_ENV};
use forge_core::{ConfigError, ForgeConfig};
use reqwest::StatusCode;
use tracing::{debug, trace};

use crate::error::ProviderError;
use crate::provider::ContentProvider;
use crate::wire::{ErrorWrapper, GenerateContentRequest, GenerateContentResponse};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a client from configuration.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &ForgeConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::InvalidValue {
            key: TIMEOUT_ENV,
            value: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: config.api_base.clone(),
        })
    }

    /// Override the base URL (for proxies or test servers).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Endpoint for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl ContentProvider for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        trace!("Sending generateContent request: {:?}", request.last_turn());

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        debug!(
            model,
            candidates = response.candidates.len(),
            "generateContent response received"
        );
        Ok(response)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Turn a non-success response into a [`ProviderError::Api`].
///
/// Uses the JSON error body's status and message when present, the raw body
/// otherwise.
fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string());

    ProviderError::Api {
        status: status.as_u16(),
        message,
    }
}
