//! Interactive chat REPL on an analyzed source.

use std::path::PathBuf;
use std::time::Duration;

use forge_core::prompts::{loading_stage, Action, LOADING_STAGE_SECS};
use forge_core::{state_dir, ForgeConfig};
use forge_models::{AnalysisInput, ComplexityMode};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::cli::SourceArgs;
use crate::clipboard::{copy_last_reply, SystemClipboard};
use crate::commands::{format_message, format_sources};
use crate::controller::Controller;
use crate::error::Result;

const HISTORY_FILE: &str = "chat_history.txt";

/// Slash commands with their one-line descriptions.
static COMMAND_HELP: &[(&str, &str)] = &[
    ("/mode [simple|standard|expert]", "Show or set answer complexity"),
    ("/thread", "Turn the last answer into a social media thread"),
    ("/opposing", "Find credible sources that disagree"),
    ("/sources", "List the sources cited most recently"),
    ("/copy", "Copy the latest answer to the clipboard"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] =
        &["/copy", "/help", "/mode", "/opposing", "/quit", "/sources", "/thread"];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show or set the complexity mode
    Mode(Option<String>),
    /// Canned thread action
    Thread,
    /// Canned opposing-views action
    Opposing,
    /// List the latest sources
    Sources,
    /// Copy the latest answer
    Copy,
    /// Show help
    Help,
    /// Quit the REPL
    Quit,
    /// Unknown command
    Unknown(String),
    /// A follow-up question
    Text(String),
}

impl ReplCommand {
    /// Parses input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        let Some(stripped) = input.strip_prefix('/') else {
            return ReplCommand::Text(input.to_string());
        };

        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts
            .get(1)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match cmd.as_str() {
            "mode" | "m" => ReplCommand::Mode(arg),
            "thread" | "t" => ReplCommand::Thread,
            "opposing" | "o" => ReplCommand::Opposing,
            "sources" | "s" => ReplCommand::Sources,
            "copy" | "c" => ReplCommand::Copy,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(cmd),
        }
    }
}

/// Line-oriented chat on one analyzed source.
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    controller: Controller,
    clipboard: SystemClipboard,
    runtime: Runtime,
    history_path: PathBuf,
}

impl Repl {
    /// Create a REPL around a controller.
    pub fn new(controller: Controller) -> Result<Self> {
        let config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandCompleter));

        let history_path = state_dir().join(HISTORY_FILE);
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        Ok(Self {
            editor,
            controller,
            clipboard: SystemClipboard::new(),
            runtime: Runtime::new()?,
            history_path,
        })
    }

    /// Analyze `input`, then read follow-ups until quit.
    pub fn run(&mut self, input: AnalysisInput) -> Result<()> {
        println!("InsightForge chat v{}", env!("CARGO_PKG_VERSION"));
        self.analyze(input)?;

        if let Some(message) = self.controller.state().transcript().last() {
            println!("\n{}\n", format_message(message));
        }
        println!("Type /help for commands, /quit to exit");

        loop {
            match self.editor.readline(&self.prompt()) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.as_str())?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);

        println!("Goodbye!");
        Ok(())
    }

    /// Run the first analysis, printing loading stages while it runs.
    fn analyze(&mut self, input: AnalysisInput) -> Result<()> {
        println!("Analyzing {}...", input.label());
        let controller = &mut self.controller;

        let result = self.runtime.block_on(async {
            let analysis = controller.analyze(input);
            tokio::pin!(analysis);

            let started = tokio::time::Instant::now();
            let mut ticker = tokio::time::interval(Duration::from_secs(LOADING_STAGE_SECS));
            let mut last_stage = "";
            loop {
                tokio::select! {
                    result = &mut analysis => break result,
                    _ = ticker.tick() => {
                        let stage = loading_stage(started.elapsed().as_secs());
                        if stage != last_stage {
                            println!("  {}", stage);
                            last_stage = stage;
                        }
                    }
                }
            }
        });

        if let Err(e) = result {
            if let Some(notice) = self.controller.state().notice() {
                eprintln!("\n{}\n\n{}\n", notice.title(), notice.body());
            }
            return Err(e);
        }
        Ok(())
    }

    /// Returns the prompt string.
    fn prompt(&self) -> String {
        format!("insightforge [{}]> ", self.controller.state().mode().short_label())
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    fn handle_command(&mut self, cmd: ReplCommand) -> Result<bool> {
        match cmd {
            ReplCommand::Text(text) => {
                let message = self.runtime.block_on(self.controller.submit(&text))?;
                println!("\n{}\n", format_message(message));
            }
            ReplCommand::Thread => self.run_action(Action::Thread)?,
            ReplCommand::Opposing => self.run_action(Action::Opposing)?,
            ReplCommand::Mode(None) => {
                println!("Mode: {}", self.controller.state().mode());
            }
            ReplCommand::Mode(Some(value)) => match value.parse::<ComplexityMode>() {
                Ok(mode) => {
                    self.controller.state_mut().set_mode(mode);
                    println!("Mode set to {}", mode);
                }
                Err(e) => println!("{} (use simple, standard or expert)", e),
            },
            ReplCommand::Sources => {
                let sources = self.controller.state().transcript().last_sources();
                if sources.is_empty() {
                    println!("No sources cited yet.");
                } else {
                    println!("{}", format_sources(sources));
                }
            }
            ReplCommand::Copy => {
                match copy_last_reply(self.controller.state().transcript(), &mut self.clipboard)? {
                    Some(_) => println!("Copied to clipboard."),
                    None => println!("Nothing to copy yet."),
                }
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => return Ok(true),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: /{}. Type /help for available commands.", cmd);
            }
        }
        Ok(false)
    }

    fn run_action(&mut self, action: Action) -> Result<()> {
        println!("{}", action.banner());
        let message = self.runtime.block_on(self.controller.action(action))?;
        println!("\n{}\n", format_message(message));
        Ok(())
    }
}

fn print_help() {
    println!("Commands:");
    for (usage, brief) in COMMAND_HELP {
        println!("  {:<32} {}", usage, brief);
    }
    println!();
    println!("Anything else is sent as a follow-up question.");
}

/// Resolve `source`, analyze it and chat about it.
pub fn run(source: &SourceArgs, mode: ComplexityMode, config: ForgeConfig) -> Result<()> {
    let mut controller = Controller::from_config(config)?;
    let input = source.resolve()?;
    controller.state_mut().set_mode(mode);

    let mut repl = Repl::new(controller)?;
    repl.run(input)
}
