//! InsightForge Core - shared business logic for all InsightForge interfaces.
//!
//! This crate provides functionality used by the TUI, the REPL and the
//! one-shot report command:
//!
//! - **config**: State directories, `.env.local` loading and runtime settings
//! - **favicon**: Favicon-by-domain URLs for source cards
//! - **prompts**: System instruction, request templates and canned texts
//! - **resolver**: Turn URLs and files into analysis requests; primary sources

pub mod config;
pub mod favicon;
pub mod prompts;
pub mod resolver;

// Re-export commonly used items for convenience
pub use config::{
    ensure_logs_dir, env_file, load_env, log_file, logs_dir, state_dir, ConfigError, ForgeConfig,
};
pub use favicon::{favicon_url, FALLBACK_FAVICON_URL};
pub use resolver::{
    dedup_sources, domain_of, merge_primary_source, primary_source, resolve_file, resolve_path, resolve_url,
    ResolveError,
};
