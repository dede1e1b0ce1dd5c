//! InsightForge CLI entry point.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use clap::Parser;
use forge_core::{ensure_logs_dir, load_env, log_file, ForgeConfig};
use tracing_subscriber::{fmt, EnvFilter};

use insightforge::cli::Cli;
use insightforge::commands;

fn main() {
    // Load .env.local from the working and state directories (GEMINI_API_KEY etc.)
    load_env();

    let cli = Cli::parse();
    init_tracing(&cli);

    let config = match ForgeConfig::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::execute(cli.into_command(), config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing. The TUI owns the terminal, so it logs to a file.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    let builder = fmt().with_env_filter(filter).with_target(false);

    if !cli.is_tui() {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    match open_log_file() {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn open_log_file() -> Option<File> {
    ensure_logs_dir().ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file())
        .ok()
}
