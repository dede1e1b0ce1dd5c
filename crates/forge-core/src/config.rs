//! Shared configuration for InsightForge.
//!
//! Provides functions to locate InsightForge's state directory, load
//! secrets from `.env.local`, and build the runtime [`ForgeConfig`].
//!
//! # Storage Structure
//!
//! ```text
//! ~/.insightforge/
//! ├── .env.local    # Secrets (GEMINI_API_KEY)
//! └── logs/         # TUI log file
//! ```
//!
//! # Environment Variables
//!
//! - `INSIGHTFORGE_STATE_DIR`: Override the base state directory
//! - `INSIGHTFORGE_LOG_DIR`: Override the log directory
//! - `GEMINI_API_KEY` (or `API_KEY`): Provider credential
//! - `INSIGHTFORGE_MODEL`: Model identifier
//! - `INSIGHTFORGE_API_BASE`: Provider base URL
//! - `INSIGHTFORGE_MIN_DELAY_MS`: Minimum analyzing duration
//! - `INSIGHTFORGE_DEEP_DELAY_MS`: Minimum analyzing duration in deep research
//! - `INSIGHTFORGE_TIMEOUT_SECS`: HTTP request timeout

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "INSIGHTFORGE_STATE_DIR";

/// Environment variable for custom log directory.
pub const LOG_DIR_ENV: &str = "INSIGHTFORGE_LOG_DIR";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Fallback credential variable.
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

/// Environment variable for the model identifier.
pub const MODEL_ENV: &str = "INSIGHTFORGE_MODEL";

/// Environment variable for the provider base URL.
pub const API_BASE_ENV: &str = "INSIGHTFORGE_API_BASE";

/// Environment variable for the standard minimum analyzing duration.
pub const MIN_DELAY_ENV: &str = "INSIGHTFORGE_MIN_DELAY_MS";

/// Environment variable for the deep research minimum analyzing duration.
pub const DEEP_DELAY_ENV: &str = "INSIGHTFORGE_DEEP_DELAY_MS";

/// Environment variable for the HTTP request timeout.
pub const TIMEOUT_ENV: &str = "INSIGHTFORGE_TIMEOUT_SECS";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default provider base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".insightforge";

const LOGS_SUBDIR: &str = "logs";
const LOG_FILE_NAME: &str = "insightforge.log";
const ENV_FILE_NAME: &str = ".env.local";

/// Errors raised while building configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No provider credential is configured.
    #[error("GEMINI_API_KEY is not set. Add it to your environment or {}", env_file().display())]
    MissingApiKey,

    /// An environment variable holds an unusable value.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Get the InsightForge state directory.
///
/// The state directory is determined by:
/// 1. `INSIGHTFORGE_STATE_DIR` environment variable if set
/// 2. `~/.insightforge` if home directory is available
/// 3. `.insightforge` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the logs directory.
///
/// Defaults to `~/.insightforge/logs/` or `INSIGHTFORGE_LOG_DIR` env var.
pub fn logs_dir() -> PathBuf {
    std::env::var(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(LOGS_SUBDIR))
}

/// Get the log file used while the TUI owns the terminal.
pub fn log_file() -> PathBuf {
    logs_dir().join(LOG_FILE_NAME)
}

/// Get the .env.local file path.
///
/// Environment file for secrets (API keys).
pub fn env_file() -> PathBuf {
    state_dir().join(ENV_FILE_NAME)
}

/// Ensure the logs directory exists.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load `.env.local` from the working directory and the state directory.
///
/// Variables already present in the environment are never overridden, so
/// the working-directory file wins over the state-directory file.
pub fn load_env() {
    if dotenvy::from_filename(ENV_FILE_NAME).is_ok() {
        debug!("Loaded {} from working directory", ENV_FILE_NAME);
    }
    let path = env_file();
    if path.exists() && dotenvy::from_path(&path).is_ok() {
        debug!(path = %path.display(), "Loaded state directory env file");
    }
}

/// Runtime settings for the analysis client and front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgeConfig {
    /// Provider credential, if configured.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Provider base URL (without the `/{model}:generateContent` suffix).
    pub api_base: String,
    /// Minimum time spent in the analyzing view.
    pub min_delay: Duration,
    /// Minimum time spent in the analyzing view for deep research.
    pub deep_research_delay: Duration,
    /// HTTP request timeout. `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            min_delay: Duration::from_millis(5000),
            deep_research_delay: Duration::from_millis(8000),
            request_timeout: None,
        }
    }
}

impl ForgeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.api_key = non_empty(API_KEY_ENV).or_else(|| non_empty(LEGACY_API_KEY_ENV));
        if let Some(model) = non_empty(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base) = non_empty(API_BASE_ENV) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(raw) = non_empty(MIN_DELAY_ENV) {
            config.min_delay = Duration::from_millis(parse_number(MIN_DELAY_ENV, &raw)?);
        }
        if let Some(raw) = non_empty(DEEP_DELAY_ENV) {
            config.deep_research_delay = Duration::from_millis(parse_number(DEEP_DELAY_ENV, &raw)?);
        }
        if let Some(raw) = non_empty(TIMEOUT_ENV) {
            config.request_timeout = Some(Duration::from_secs(parse_number(TIMEOUT_ENV, &raw)?));
        }

        Ok(config)
    }

    /// Sets the provider credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the provider base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets both minimum analyzing durations.
    pub fn with_delays(mut self, standard: Duration, deep_research: Duration) -> Self {
        self.min_delay = standard;
        self.deep_research_delay = deep_research;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Whether a credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the credential or [`ConfigError::MissingApiKey`].
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Minimum analyzing duration for a request.
    pub fn minimum_delay(&self, deep_research: bool) -> Duration {
        if deep_research {
            self.deep_research_delay
        } else {
            self.min_delay
        }
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
