//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use forge_core::{resolve_path, resolve_url, ForgeConfig};
use forge_models::{AnalysisInput, ComplexityMode};

use crate::error::Result;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// InsightForge - research assistant with cited answers
#[derive(Parser, Debug)]
#[command(name = "insightforge")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model identifier
    #[arg(short, long, env = "INSIGHTFORGE_MODEL", global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the full-screen interface (default)
    Tui,

    /// Analyze a source, then ask follow-up questions
    Chat {
        #[command(flatten)]
        source: SourceArgs,

        /// Complexity of answers (simple, standard, expert)
        #[arg(long, default_value = "standard")]
        mode: ComplexityMode,
    },

    /// Analyze a source and print the report
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// What to analyze.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SourceArgs {
    /// URL of the article, video or paper
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub url: Option<String>,

    /// Local PDF or text document
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Deep research: cross-reference 3-5 other sources (URLs only)
    #[arg(short, long)]
    pub deep: bool,
}

impl SourceArgs {
    /// Resolve the arguments into an analysis request.
    pub fn resolve(&self) -> Result<AnalysisInput> {
        match (&self.file, &self.url) {
            (Some(path), _) => Ok(resolve_path(path)?),
            (None, Some(url)) => Ok(resolve_url(url, self.deep)?),
            (None, None) => Ok(resolve_url("", self.deep)?),
        }
    }
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Whether the full-screen interface will run.
    pub fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }

    /// The command to run; no subcommand opens the TUI.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Tui)
    }

    /// Apply command-line overrides to `config`.
    pub fn apply(&self, config: ForgeConfig) -> ForgeConfig {
        match &self.model {
            Some(model) => config.with_model(model.as_str()),
            None => config,
        }
    }
}
