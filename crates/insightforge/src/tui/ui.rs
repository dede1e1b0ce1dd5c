//! TUI rendering using ratatui.

use forge_core::prompts::{banner_for, LOADING_STAGES};
use forge_models::{ComplexityMode, Message, Role, ViewState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::app::App;

/// Draw the TUI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status/Progress bar
            Constraint::Length(3), // Input area
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    match app.state.view() {
        ViewState::Landing => draw_landing(frame, app, chunks[1]),
        ViewState::Analyzing => draw_analyzing(frame, app, chunks[1]),
        ViewState::Chat => draw_transcript(frame, app, chunks[1]),
    }
    draw_status(frame, app, chunks[2]);
    draw_input(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    if app.state.notice().is_some() {
        draw_notice(frame, app);
    }
}

/// Draw the header bar.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut header_text = format!(" InsightForge - {} ", app.state.view());
    if let Some(input) = app.pending_input() {
        header_text.push_str(&format!("| {} ", input.label()));
        if input.is_deep_research() {
            header_text.push_str("[deep research] ");
        }
    }

    let header = Paragraph::new(header_text)
        .style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD));

    frame.render_widget(header, area);
}

/// Draw the landing form.
fn draw_landing(frame: &mut Frame, app: &App, area: Rect) {
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let mut lines = vec![
        Line::from(Span::styled(
            "Turn any link or document into cited insight",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Paste an article, video or paper URL, or switch to a local PDF or text file."),
        Line::from(""),
        Line::from(format!("  Source:        {}", app.source_kind.label())),
        Line::from(format!(
            "  Deep research: {} cross-reference 3-5 other sources (URLs only)",
            check(app.deep_research)
        )),
    ];

    if let Some(warning) = app.missing_key_warning() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            warning,
            Style::default().fg(Color::Red),
        )));
    }

    let landing = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" New research "));

    frame.render_widget(landing, area);
}

/// Draw the staged loading list.
fn draw_analyzing(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.loading_stage();
    let current_idx = LOADING_STAGES
        .iter()
        .position(|stage| *stage == current)
        .unwrap_or(0);

    let mut lines = vec![Line::from("")];
    for (i, stage) in LOADING_STAGES.iter().enumerate() {
        let (marker, style) = if i < current_idx {
            ("done ", Style::default().fg(Color::Green))
        } else if i == current_idx {
            (" ... ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("     ", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(Span::styled(format!("  {} {}", marker, stage), style)));
    }

    let analyzing = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Analyzing "));

    frame.render_widget(analyzing, area);
}

/// Draw the scrollable transcript.
fn draw_transcript(frame: &mut Frame, app: &mut App, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize; // Account for borders
    let inner_width = area.width.saturating_sub(2) as usize;

    let copied = app.copied_message_id().cloned();
    let mut lines = Vec::new();
    for message in app.state.transcript().messages() {
        let is_copied = copied.as_ref() == Some(&message.id);
        message_lines(message, inner_width, is_copied, &mut lines);
    }
    if app.state.is_thinking() {
        lines.push(Line::from(Span::styled(
            "InsightForge is thinking...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }

    app.max_scroll = lines.len().saturating_sub(inner_height);
    let offset = app.scroll_offset.min(app.max_scroll);
    let end_idx = lines.len().saturating_sub(offset);
    let start_idx = end_idx.saturating_sub(inner_height);
    let visible: Vec<Line> = lines.drain(start_idx..end_idx).collect();

    let title = if offset > 0 {
        format!(" Chat [scroll: {}] ", offset)
    } else {
        " Chat ".to_string()
    };

    let transcript = Paragraph::new(visible).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(transcript, area);
}

/// Append the rendered lines of one message.
fn message_lines(message: &Message, width: usize, copied: bool, lines: &mut Vec<Line<'static>>) {
    match message.role {
        Role::User => {
            lines.push(Line::from(Span::styled(
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            match banner_for(message.display_type) {
                Some(banner) => lines.push(Line::from(Span::styled(
                    format!("[{}]", banner),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
                ))),
                None => {
                    for text in wrap(&message.text, width) {
                        lines.push(Line::from(text));
                    }
                }
            }
        }
        Role::Model => {
            let mut header = vec![Span::styled(
                "InsightForge",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )];
            if copied {
                header.push(Span::styled("  [copied]", Style::default().fg(Color::Green)));
            }
            lines.push(Line::from(header));
            for text in wrap(&message.text, width) {
                lines.push(Line::from(text));
            }
            if !message.sources.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Sources",
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )));
                for (i, source) in message.sources.iter().enumerate() {
                    let card = format!("[{}] {} - {}", i + 1, source.title, source.domain);
                    for text in wrap(&card, width) {
                        lines.push(Line::from(Span::styled(
                            text,
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                    for text in wrap(&source.uri, width.saturating_sub(4)) {
                        lines.push(Line::from(Span::styled(
                            format!("    {}", text),
                            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                        )));
                    }
                }
            }
        }
    }
    lines.push(Line::from(""));
}

/// Greedy word wrap by character count. Overlong words are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in raw.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;

            while current_len > width {
                let head: String = current.chars().take(width).collect();
                current = current.chars().skip(width).collect();
                current_len -= width;
                lines.push(head);
            }
        }
        lines.push(current);
    }

    lines
}

/// Draw the status/progress bar.
fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let working_label = match app.state.view() {
        ViewState::Analyzing => Some(app.loading_stage()),
        ViewState::Chat if app.state.is_thinking() => Some("Thinking..."),
        _ => None,
    };

    if let Some(label) = working_label {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
            .ratio(app.progress.clamp(0.0, 1.0))
            .label(format!(" {} ", label));
        frame.render_widget(gauge, area);
        return;
    }

    let (text, style) = match &app.status {
        Some(status) => (
            format!(" {} ", status),
            Style::default().bg(Color::DarkGray).fg(Color::LightRed),
        ),
        None => (
            format!(" Ready - {} ", app.config().model),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Draw the input area.
fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let (prompt, title) = match app.state.view() {
        ViewState::Landing => match app.source_kind {
            super::SourceKind::Url => ("url> ", " Source URL "),
            super::SourceKind::File => ("file> ", " File path "),
        },
        ViewState::Analyzing => ("", " Please wait "),
        ViewState::Chat => ("ask> ", " Ask a follow-up "),
    };

    let input_style = if app.state.view() == ViewState::Analyzing || app.state.is_thinking() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let input_text = format!("{}{}", prompt, app.input);
    let input = Paragraph::new(input_text)
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(input, area);

    if app.state.view() != ViewState::Analyzing && app.state.notice().is_none() {
        let cursor_x = area.x + prompt.len() as u16 + app.cursor_pos as u16 + 1;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Draw the footer with keybindings.
fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer_text = match app.state.view() {
        ViewState::Landing => {
            " Enter: analyze | Tab: URL/file | Ctrl+D: deep research | Esc: quit ".to_string()
        }
        ViewState::Analyzing => " Analyzing... | Ctrl+C: quit ".to_string(),
        ViewState::Chat => format!(
            " {} | Tab: mode | Ctrl+T: thread | Ctrl+O: opposing | Ctrl+Y: copy | Up/Down: scroll | Esc: quit ",
            mode_selector(app.state.mode())
        ),
    };

    let footer = Paragraph::new(footer_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(footer, area);
}

/// Mode labels with the active one bracketed.
fn mode_selector(active: ComplexityMode) -> String {
    ComplexityMode::ALL
        .iter()
        .map(|mode| {
            if *mode == active {
                format!("[{}]", mode.short_label())
            } else {
                mode.short_label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draw the capacity notice over the current view.
fn draw_notice(frame: &mut Frame, app: &App) {
    let Some(notice) = app.state.notice() else {
        return;
    };

    let area = centered_rect(60, 16, frame.area());
    let mut lines = vec![Line::from("")];
    lines.extend(notice.body().lines().map(Line::from));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to dismiss",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", notice.title())),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A rectangle `percent_x` wide and `height` tall in the middle of `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
