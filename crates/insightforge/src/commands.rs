//! Command handlers for CLI subcommands and shared text rendering.

use forge_core::prompts::banner_for;
use forge_core::{favicon_url, ForgeConfig, FALLBACK_FAVICON_URL};
use forge_models::{AnalysisInput, Message, Role, Source};
use serde::Serialize;
use tracing::info;

use crate::cli::{Commands, SourceArgs};
use crate::controller::Controller;
use crate::error::Result;
use crate::repl;
use crate::tui;

/// Execute a CLI command.
pub fn execute(command: Commands, config: ForgeConfig) -> Result<()> {
    match command {
        Commands::Tui => tui::run(config),
        Commands::Analyze { source, json } => cmd_analyze(&source, json, config),
        Commands::Chat { source, mode } => repl::run(&source, mode, config),
    }
}

fn cmd_analyze(source: &SourceArgs, json: bool, config: ForgeConfig) -> Result<()> {
    let mut controller = Controller::from_config(config)?;
    let input = source.resolve()?;
    let runtime = tokio::runtime::Runtime::new()?;

    eprintln!("Analyzing {}...", input.label());
    info!(source = input.label(), json, "One-shot analysis");

    let report_input = input.clone();
    if let Err(e) = runtime.block_on(controller.analyze(input)) {
        if let Some(notice) = controller.state().notice() {
            eprintln!("{}\n\n{}\n", notice.title(), notice.body());
        }
        return Err(e);
    }

    let Some(message) = controller.state().transcript().last() else {
        return Ok(());
    };
    let report = Report::new(&report_input, message);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_message(message));
    }
    Ok(())
}

/// Machine-readable analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// URL or file name that was analyzed.
    pub source: String,
    /// Whether deep research was requested.
    pub deep_research: bool,
    /// Markdown analysis.
    pub text: String,
    /// Cited sources, primary source first for URLs.
    pub sources: Vec<SourceCard>,
}

impl Report {
    /// Build a report for the seeded analysis message.
    pub fn new(input: &AnalysisInput, message: &Message) -> Self {
        Self {
            source: input.label().to_string(),
            deep_research: input.is_deep_research(),
            text: message.text.clone(),
            sources: source_cards(&message.sources),
        }
    }
}

/// A numbered source with its favicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCard {
    /// 1-based citation number.
    pub index: usize,
    /// Page title.
    pub title: String,
    /// Page URI.
    pub uri: String,
    /// Display domain.
    pub domain: String,
    /// Favicon for the domain.
    pub favicon: String,
    /// Icon to use if the favicon cannot be loaded.
    pub favicon_fallback: &'static str,
}

/// Number sources and attach favicons.
pub fn source_cards(sources: &[Source]) -> Vec<SourceCard> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| SourceCard {
            index: i + 1,
            title: source.title.clone(),
            uri: source.uri.clone(),
            domain: source.domain.clone(),
            favicon: favicon_url(&source.domain),
            favicon_fallback: FALLBACK_FAVICON_URL,
        })
        .collect()
}

/// Render sources as a numbered list.
pub fn format_sources(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  [{}] {} ({})\n      {}", i + 1, s.title, s.domain, s.uri))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a transcript message for line-oriented output.
///
/// Action requests show their banner instead of the prompt.
pub fn format_message(message: &Message) -> String {
    match message.role {
        Role::User => match banner_for(message.display_type) {
            Some(banner) => format!("> [{}]", banner),
            None => format!("> {}", message.text),
        },
        Role::Model if message.sources.is_empty() => message.text.clone(),
        Role::Model => format!(
            "{}\n\nSources:\n{}",
            message.text,
            format_sources(&message.sources)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::primary_source;
    use forge_core::prompts::Action;
    use forge_models::DisplayType;

    #[test]
    fn test_format_user_message() {
        let plain = Message::user("What is it?", DisplayType::Text);
        assert_eq!(format_message(&plain), "> What is it?");

        let action = Message::user(Action::Opposing.prompt(), Action::Opposing.display_type());
        assert_eq!(format_message(&action), "> [Analyzing Counter-Arguments...]");
    }

    #[test]
    fn test_format_model_message_with_sources() {
        let message = Message::model(
            "Summary [1]",
            vec![Source::new("Example", "https://www.example.com/a", "example.com")],
        );
        assert_eq!(
            format_message(&message),
            "Summary [1]\n\nSources:\n  [1] Example (example.com)\n      https://www.example.com/a"
        );

        let bare = Message::model("Just text", Vec::new());
        assert_eq!(format_message(&bare), "Just text");
    }

    #[test]
    fn test_report_json_shape() {
        let input = AnalysisInput::url("https://www.example.com/a", true);
        let message = Message::model("Report", vec![primary_source("https://www.example.com/a")]);

        let report = Report::new(&input, &message);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["source"], "https://www.example.com/a");
        assert_eq!(value["deep_research"], true);
        assert_eq!(value["text"], "Report");
        assert_eq!(value["sources"][0]["index"], 1);
        assert_eq!(value["sources"][0]["domain"], "example.com");
        assert_eq!(
            value["sources"][0]["favicon"],
            "https://www.google.com/s2/favicons?sz=64&domain=example.com"
        );
        assert_eq!(value["sources"][0]["favicon_fallback"], FALLBACK_FAVICON_URL);
    }

    #[test]
    fn test_analyze_without_key_fails_before_network() {
        let source = SourceArgs {
            url: Some("https://a.com".into()),
            file: None,
            deep: false,
        };
        let result = cmd_analyze(&source, false, ForgeConfig::new());
        assert!(matches!(
            result,
            Err(crate::error::AppError::Config(forge_core::ConfigError::MissingApiKey))
        ));
    }
}
