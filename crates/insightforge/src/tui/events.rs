//! Event handling for the TUI.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use forge_client::{AnalysisClient, GeminiClient};
use forge_core::prompts::Action;
use forge_core::ForgeConfig;
use forge_models::ViewState;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use super::app::App;
use super::ui;
use crate::error::Result;
use crate::worker::ClientWorker;

/// Initialize the terminal for TUI mode.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI event loop.
pub fn run(config: ForgeConfig) -> Result<()> {
    // The runtime must outlive the worker task
    let runtime = Runtime::new()?;

    let worker = match GeminiClient::from_config(&config) {
        Ok(provider) => {
            let client = AnalysisClient::new(provider, config.model.clone());
            Some(ClientWorker::spawn(runtime.handle(), client))
        }
        Err(e) => {
            warn!(error = %e, "Analysis disabled");
            None
        }
    };
    info!(model = %config.model, "Starting TUI");

    let mut app = App::new(config, worker);

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop.
fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch a key press for the active view.
fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The notice is modal
    if app.state.notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.state.dismiss_notice();
        }
        return;
    }

    if key.code == KeyCode::Esc {
        app.handle_escape();
        return;
    }

    match app.state.view() {
        ViewState::Landing => match key.code {
            KeyCode::Char('d') if ctrl => app.toggle_deep_research(),
            KeyCode::Tab => app.toggle_source_kind(),
            KeyCode::Enter => app.submit(),
            _ => edit_input(app, key),
        },
        ViewState::Analyzing => {}
        ViewState::Chat => match key.code {
            KeyCode::Char('t') if ctrl => app.trigger_action(Action::Thread),
            KeyCode::Char('o') if ctrl => app.trigger_action(Action::Opposing),
            KeyCode::Char('y') if ctrl => app.copy_last_reply(),
            KeyCode::Tab => {
                app.cycle_mode();
            }
            KeyCode::Enter => app.submit(),
            KeyCode::Up => app.scroll_up(),
            KeyCode::Down => app.scroll_down(),
            KeyCode::PageUp => app.scroll_page_up(10),
            KeyCode::PageDown => app.scroll_page_down(10),
            _ => edit_input(app, key),
        },
    }
}

/// Line editing shared by the landing and chat inputs.
fn edit_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('u') {
            app.clear_input();
        }
        return;
    }

    match key.code {
        KeyCode::Char(c) => app.enter_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key(app, KeyEvent::new(code, modifiers));
    }

    #[test]
    fn test_landing_keys() {
        let mut app = App::new(ForgeConfig::new(), None);

        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert_eq!(app.input, "aB");

        press(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(app.deep_research);
        assert_eq!(app.input, "aB");

        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.source_kind, crate::tui::SourceKind::File);

        press(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_ctrl_y_ignored_on_landing() {
        let mut app = App::new(ForgeConfig::new(), None);
        press(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert!(app.input.is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = App::new(ForgeConfig::new(), None);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);

        let mut app = App::new(ForgeConfig::new(), None);
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
