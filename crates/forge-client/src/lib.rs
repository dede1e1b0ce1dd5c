//! Remote analysis client for InsightForge.
//!
//! Wraps a generative-content provider (Google Gemini with the
//! `google_search` grounding tool) behind a single owned chat session.
//!
//! # Core Types
//!
//! - [`ContentProvider`]: The provider boundary (one `generateContent` call)
//! - [`GeminiClient`]: reqwest-backed provider implementation
//! - [`ChatSession`]: The remote conversation (system instruction, tools, turns)
//! - [`AnalysisClient`]: Owns at most one session; start and follow-up calls
//! - [`extract_sources`]: Grounding metadata to citation sources
//!
//! # Example
//!
//! ```ignore
//! use forge_client::{AnalysisClient, GeminiClient};
//! use forge_core::{resolve_url, ForgeConfig};
//! use forge_models::ComplexityMode;
//!
//! let config = ForgeConfig::from_env()?;
//! let provider = GeminiClient::from_config(&config)?;
//! let mut client = AnalysisClient::new(provider, &config.model);
//!
//! let input = resolve_url("https://example.com/post", false)?;
//! let reply = client.start_analysis(input).await?;
//! let follow_up = client.send_follow_up("What is the main claim?", ComplexityMode::Expert).await?;
//! ```

pub mod analysis;
pub mod citations;
pub mod error;
pub mod gemini;
pub mod provider;
pub mod session;
pub mod wire;

// Re-export commonly used items
pub use analysis::{AnalysisClient, Reply};
pub use citations::extract_sources;
pub use error::{AnalysisError, ProviderError, Result};
pub use gemini::GeminiClient;
pub use provider::ContentProvider;
pub use session::ChatSession;
pub use wire::{Content, GenerateContentRequest, GenerateContentResponse, Part};
