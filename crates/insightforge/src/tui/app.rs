//! TUI application state and logic.

use std::time::{Duration, Instant};

use forge_client::{AnalysisError, ProviderError, Reply};
use forge_core::prompts::{loading_stage, Action};
use forge_core::{env_file, resolve_path, resolve_url, ForgeConfig};
use forge_models::{AnalysisInput, ComplexityMode, DisplayType, MessageId, ViewState};
use tracing::{debug, warn};

use crate::clipboard::{copy_last_reply, Clipboard, SystemClipboard};
use crate::controller::ResearchState;
use crate::error::AppError;
use crate::transcript::SubmitRejected;
use crate::worker::{ClientWorker, WorkerCommand, WorkerEvent};

/// How long a copy confirmation stays visible.
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

const COPIED_STATUS: &str = "Copied to clipboard";

/// What the landing input holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// A web address.
    #[default]
    Url,
    /// A path to a PDF or text document.
    File,
}

impl SourceKind {
    /// Label for the landing form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::File => "File",
        }
    }
}

/// TUI application state.
pub struct App {
    /// View, transcript, notice and mode
    pub state: ResearchState,
    worker: Option<ClientWorker>,
    config: ForgeConfig,

    // Input
    /// Current input text
    pub input: String,
    /// Cursor position in input, in characters
    pub cursor_pos: usize,
    /// What the landing input is interpreted as
    pub source_kind: SourceKind,
    /// Deep research toggle on the landing form
    pub deep_research: bool,

    // Output
    /// Scroll offset for the transcript, in lines from the bottom
    pub scroll_offset: usize,
    /// Largest useful scroll offset, updated on draw
    pub max_scroll: usize,
    /// Progress indicator (0.0 - 1.0)
    pub progress: f64,
    /// One-line status or validation message
    pub status: Option<String>,
    clipboard: Box<dyn Clipboard>,
    copied: Option<(MessageId, Instant)>,

    // Runtime
    /// Whether the app should quit
    pub should_quit: bool,
    analyzing_since: Option<Instant>,
}

impl App {
    /// Create the app. Without a worker (no API key) analysis is blocked.
    pub fn new(config: ForgeConfig, worker: Option<ClientWorker>) -> Self {
        Self {
            state: ResearchState::new(),
            worker,
            config,
            input: String::new(),
            cursor_pos: 0,
            source_kind: SourceKind::Url,
            deep_research: false,
            scroll_offset: 0,
            max_scroll: 0,
            progress: 0.0,
            status: None,
            clipboard: Box::new(SystemClipboard::new()),
            copied: None,
            should_quit: false,
            analyzing_since: None,
        }
    }

    /// Use `clipboard` for copies instead of the system clipboard.
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    /// Whether requests can be made.
    pub fn has_api_key(&self) -> bool {
        self.worker.is_some()
    }

    /// Warning shown on the landing view when no key is configured.
    pub fn missing_key_warning(&self) -> Option<String> {
        if self.has_api_key() {
            return None;
        }
        Some(format!(
            "GEMINI_API_KEY is not set. Add it to your environment or {}",
            env_file().display()
        ))
    }

    /// Active configuration.
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Submit the current input for the active view.
    pub fn submit(&mut self) {
        match self.state.view() {
            ViewState::Landing => self.start_analysis(),
            ViewState::Analyzing => {}
            ViewState::Chat => {
                let text = self.input.clone();
                if self.follow_up(&text, DisplayType::Text) {
                    self.clear_input();
                }
            }
        }
    }

    /// Run a canned action in the chat view.
    pub fn trigger_action(&mut self, action: Action) {
        if self.state.view() == ViewState::Chat {
            self.follow_up(action.prompt(), action.display_type());
        }
    }

    fn start_analysis(&mut self) {
        if !self.has_api_key() {
            self.status = self.missing_key_warning();
            return;
        }

        let raw = self.input.trim().to_string();
        let resolved = match self.source_kind {
            SourceKind::Url => resolve_url(&raw, self.deep_research),
            SourceKind::File if raw.is_empty() => {
                self.status = Some("Please enter a file path".to_string());
                return;
            }
            SourceKind::File => resolve_path(&raw),
        };
        let input = match resolved {
            Ok(input) => input,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        if let Err(e) = self.state.begin_analysis(&input) {
            self.status = Some(e.to_string());
            return;
        }

        let minimum = self.config.minimum_delay(input.is_deep_research());
        self.status = None;
        self.progress = 0.0;
        self.analyzing_since = Some(Instant::now());
        self.clear_input();

        if let Err(e) = self.send(WorkerCommand::Analyze { input, minimum }) {
            self.analyzing_since = None;
            let failure = AnalysisError::AnalysisFailure(ProviderError::Request(e.to_string()));
            self.apply_analysis(Err(failure));
        }
    }

    /// Send a follow-up. Returns whether it was accepted.
    fn follow_up(&mut self, text: &str, display_type: DisplayType) -> bool {
        match self.state.begin_follow_up(text, display_type) {
            Ok(()) => {}
            Err(SubmitRejected::Empty) => return false,
            Err(e) => {
                self.status = Some(e.to_string());
                return false;
            }
        }

        self.status = None;
        self.scroll_to_bottom();
        let command = WorkerCommand::FollowUp {
            text: text.to_string(),
            mode: self.state.mode(),
        };
        if let Err(e) = self.send(command) {
            warn!(error = %e, "Follow-up not sent");
            self.state.finish_follow_up(Ok(Reply::fallback()));
        }
        true
    }

    fn send(&self, command: WorkerCommand) -> crate::error::Result<()> {
        match &self.worker {
            Some(worker) => worker.send(command),
            None => Err(crate::error::AppError::WorkerStopped),
        }
    }

    /// Apply an analysis outcome. Analysis failures surface as the capacity
    /// notice; anything else means the view was not analyzing.
    fn apply_analysis(&mut self, result: std::result::Result<Reply, AnalysisError>) {
        match self.state.complete_analysis(result) {
            Ok(()) | Err(AppError::Analysis(_)) => {}
            Err(e) => warn!(error = %e, "Analysis outcome not applied"),
        }
    }

    /// Apply finished worker outcomes and advance animations.
    pub fn tick(&mut self) {
        self.poll_worker();
        if self.copied_message_id().is_none()
            && self.copied.take().is_some()
            && self.status.as_deref() == Some(COPIED_STATUS)
        {
            self.status = None;
        }
        if self.state.view() == ViewState::Analyzing || self.state.is_thinking() {
            self.progress = (self.progress + 0.05) % 1.0;
        }
    }

    /// Drain finished worker outcomes.
    pub fn poll_worker(&mut self) {
        loop {
            let Some(event) = self.worker.as_ref().and_then(ClientWorker::try_recv) else {
                break;
            };
            match event {
                WorkerEvent::Analyzed(result) => {
                    self.analyzing_since = None;
                    self.apply_analysis(result);
                }
                WorkerEvent::Replied(result) => {
                    self.state.finish_follow_up(result);
                }
            }
            self.scroll_to_bottom();
        }
    }

    /// Copy the newest model message to the clipboard.
    pub fn copy_last_reply(&mut self) {
        match copy_last_reply(self.state.transcript(), self.clipboard.as_mut()) {
            Ok(Some(id)) => {
                debug!(id = id.as_str(), "Copied reply");
                self.copied = Some((id, Instant::now()));
                self.status = Some(COPIED_STATUS.to_string());
            }
            Ok(None) => self.status = Some("Nothing to copy yet".to_string()),
            Err(e) => {
                self.copied = None;
                self.status = Some(e.to_string());
            }
        }
    }

    /// Message whose copy confirmation is still showing.
    pub fn copied_message_id(&self) -> Option<&MessageId> {
        self.copied
            .as_ref()
            .filter(|(_, at)| at.elapsed() < COPY_CONFIRMATION)
            .map(|(id, _)| id)
    }

    /// Loading stage for the analyzing view.
    pub fn loading_stage(&self) -> &'static str {
        let elapsed = self
            .analyzing_since
            .map(|since| since.elapsed().as_secs())
            .unwrap_or(0);
        loading_stage(elapsed)
    }

    /// Source under analysis.
    pub fn pending_input(&self) -> Option<&AnalysisInput> {
        self.state.pending_input()
    }

    /// Escape: close the notice, otherwise quit.
    pub fn handle_escape(&mut self) {
        if self.state.notice().is_some() {
            self.state.dismiss_notice();
        } else {
            self.should_quit = true;
        }
    }

    /// Switch between URL and file input on the landing view.
    pub fn toggle_source_kind(&mut self) {
        self.source_kind = match self.source_kind {
            SourceKind::Url => SourceKind::File,
            SourceKind::File => SourceKind::Url,
        };
        self.status = None;
    }

    /// Toggle deep research on the landing view.
    pub fn toggle_deep_research(&mut self) {
        self.deep_research = !self.deep_research;
    }

    /// Switch to the next complexity mode.
    pub fn cycle_mode(&mut self) -> ComplexityMode {
        self.state.cycle_mode()
    }

    /// Scroll to the bottom of the transcript.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scroll up by one line.
    pub fn scroll_up(&mut self) {
        if self.scroll_offset < self.max_scroll {
            self.scroll_offset += 1;
        }
    }

    /// Scroll down by one line.
    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll up by a page.
    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(page_size)
            .min(self.max_scroll);
    }

    /// Scroll down by a page.
    pub fn scroll_page_down(&mut self, page_size: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(page_size);
    }

    /// Handle character input.
    pub fn enter_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input.insert(idx, c);
        self.cursor_pos += 1;
    }

    /// Delete character before cursor.
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    /// Move cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to the start of the input.
    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to the end of the input.
    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.input.chars().count();
    }

    /// Clear the input.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::controller::Notice;
    use crate::testing::{overloaded, RecordingClipboard, ScriptedProvider};

    fn app_with(provider: ScriptedProvider) -> (App, tokio::runtime::Runtime) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (client, _) = provider.into_client();
        let worker = ClientWorker::spawn(runtime.handle(), client);
        let config = ForgeConfig::new().with_delays(Duration::ZERO, Duration::ZERO);
        (App::new(config, Some(worker)), runtime)
    }

    fn open_chat(app: &mut App, summary: &str) {
        let input = AnalysisInput::url("https://a.com", false);
        app.state.begin_analysis(&input).unwrap();
        let reply = Reply {
            text: summary.to_string(),
            sources: Vec::new(),
        };
        app.state.complete_analysis(Ok(reply)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.enter_char(c);
        }
    }

    fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..250 {
            app.tick();
            if done(app) {
                return;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        panic!("condition not reached");
    }

    #[test]
    fn test_missing_key_blocks_analysis() {
        let mut app = App::new(ForgeConfig::new(), None);
        assert!(!app.has_api_key());
        assert!(app.missing_key_warning().unwrap().contains("GEMINI_API_KEY"));

        type_text(&mut app, "https://a.com");
        app.submit();

        assert_eq!(app.state.view(), ViewState::Landing);
        assert!(app.status.as_deref().unwrap().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_url_shows_validation() {
        let (mut app, _rt) = app_with(ScriptedProvider::new());
        app.submit();
        assert_eq!(app.state.view(), ViewState::Landing);
        assert_eq!(app.status.as_deref(), Some("please enter a URL to analyze"));
    }

    #[test]
    fn test_analysis_then_follow_up() {
        let (mut app, _rt) = app_with(
            ScriptedProvider::new()
                .reply_text("Summary")
                .reply_text("Answer"),
        );

        type_text(&mut app, "https://www.example.com/a");
        app.submit();
        assert_eq!(app.state.view(), ViewState::Analyzing);
        assert!(app.input.is_empty());
        assert_eq!(
            app.pending_input().and_then(|i| i.url_value()),
            Some("https://www.example.com/a")
        );

        tick_until(&mut app, |app| app.state.view() == ViewState::Chat);
        let seeded = &app.state.transcript().messages()[0];
        assert_eq!(seeded.sources[0].domain, "example.com");

        type_text(&mut app, "Why?");
        app.submit();
        assert!(app.state.is_thinking());
        tick_until(&mut app, |app| !app.state.is_thinking());

        let messages = app.state.transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].text, "Answer");
    }

    #[test]
    fn test_rapid_second_submission_rejected() {
        let (mut app, _rt) = app_with(
            ScriptedProvider::new()
                .reply_text("Summary")
                .reply_text("Answer"),
        );
        type_text(&mut app, "https://a.com");
        app.submit();
        tick_until(&mut app, |app| app.state.view() == ViewState::Chat);

        type_text(&mut app, "first");
        app.submit();
        type_text(&mut app, "second");
        app.submit();
        assert_eq!(app.status.as_deref(), Some("still waiting for the previous reply"));
        assert_eq!(app.input, "second");

        tick_until(&mut app, |app| !app.state.is_thinking());
        assert_eq!(app.state.transcript().len(), 3);
    }

    #[test]
    fn test_failed_analysis_shows_notice() {
        let (mut app, _rt) = app_with(ScriptedProvider::new().fail(overloaded()));
        type_text(&mut app, "https://a.com");
        app.submit();

        tick_until(&mut app, |app| app.state.view() == ViewState::Landing);
        assert_eq!(app.state.notice(), Some(Notice::Capacity));

        app.handle_escape();
        assert_eq!(app.state.notice(), None);
        assert!(!app.should_quit);

        app.handle_escape();
        assert!(app.should_quit);
    }

    #[test]
    fn test_file_source_resolution() {
        let (mut app, _rt) = app_with(ScriptedProvider::new().reply_text("Doc"));
        app.toggle_source_kind();
        assert_eq!(app.source_kind, SourceKind::File);

        type_text(&mut app, "/nonexistent/report.pdf");
        app.submit();
        assert_eq!(app.state.view(), ViewState::Landing);
        assert!(app.status.as_deref().unwrap().starts_with("failed to read"));

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.md");
        std::fs::write(&path, "# Notes").unwrap();
        app.clear_input();
        type_text(&mut app, path.to_str().unwrap());
        app.submit();
        tick_until(&mut app, |app| app.state.view() == ViewState::Chat);
        assert!(app.state.transcript().messages()[0].sources.is_empty());
    }

    #[test]
    fn test_action_ignored_outside_chat() {
        let (mut app, _rt) = app_with(ScriptedProvider::new());
        app.trigger_action(Action::Thread);
        assert!(app.state.transcript().is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_copy_last_reply_marks_message() {
        let clipboard = RecordingClipboard::new();
        let mut app = App::new(ForgeConfig::new(), None).with_clipboard(clipboard.clone());

        app.copy_last_reply();
        assert_eq!(app.status.as_deref(), Some("Nothing to copy yet"));
        assert!(clipboard.copied().is_empty());

        open_chat(&mut app, "Summary of the page");
        app.copy_last_reply();

        assert_eq!(clipboard.copied(), vec!["Summary of the page".to_string()]);
        assert!(app.copied_message_id().unwrap().is_initial());
        assert_eq!(app.status.as_deref(), Some("Copied to clipboard"));

        // The confirmation expires on a later tick
        let (id, _) = app.copied.take().unwrap();
        app.copied = Some((id, Instant::now() - COPY_CONFIRMATION));
        assert!(app.copied_message_id().is_none());
        app.tick();
        assert!(app.copied.is_none());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_copy_without_clipboard_reports_error() {
        let mut app =
            App::new(ForgeConfig::new(), None).with_clipboard(RecordingClipboard::unavailable());
        open_chat(&mut app, "Summary");

        app.copy_last_reply();
        assert!(app.copied_message_id().is_none());
        assert!(app.status.as_deref().unwrap().starts_with("clipboard unavailable"));
    }

    #[test]
    fn test_stray_analysis_outcome_is_ignored() {
        let mut app = App::new(ForgeConfig::new(), None);
        app.apply_analysis(Ok(Reply::fallback()));

        assert_eq!(app.state.view(), ViewState::Landing);
        assert!(app.state.transcript().is_empty());
        assert!(app.state.notice().is_none());
    }

    #[test]
    fn test_cursor_editing_unicode() {
        let mut app = App::new(ForgeConfig::new(), None);
        type_text(&mut app, "héllo");
        assert_eq!(app.cursor_pos, 5);

        app.move_cursor_left();
        app.move_cursor_left();
        app.enter_char('X');
        assert_eq!(app.input, "hélXlo");

        app.cursor_home();
        app.move_cursor_right();
        app.move_cursor_right();
        app.delete_char();
        assert_eq!(app.input, "hlXlo");

        app.cursor_end();
        assert_eq!(app.cursor_pos, 5);
        app.move_cursor_right();
        assert_eq!(app.cursor_pos, 5);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut app = App::new(ForgeConfig::new(), None);
        app.max_scroll = 3;

        app.scroll_up();
        assert_eq!(app.scroll_offset, 1);
        app.scroll_page_up(10);
        assert_eq!(app.scroll_offset, 3);
        app.scroll_page_down(2);
        assert_eq!(app.scroll_offset, 1);
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_landing_toggles() {
        let mut app = App::new(ForgeConfig::new(), None);
        assert!(!app.deep_research);
        app.toggle_deep_research();
        assert!(app.deep_research);
        assert_eq!(app.cycle_mode(), ComplexityMode::Expert);
        assert_eq!(SourceKind::default().label(), "URL");
    }
}
