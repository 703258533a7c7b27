//! Common UI components.
//!
//! This module contains the header bar, session panel, status bar, and help overlay.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{format_span, format_time};
use crate::app::App;
use crate::data::duration::format_duration;

/// Render the header bar.
///
/// Displays: status glyph, status title, probe target and interval.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.status();
    let status_style = app.theme.status_style(status);

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status.icon()), status_style),
        Span::styled(status.title(), status_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::styled("NETWATCH", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" │ probe "),
        Span::styled(app.probe_target.as_str(), Style::default().fg(app.theme.highlight)),
        Span::raw(format!(" every {}", format_duration(app.poll_interval))),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the session panel: current status, start time, last check.
pub fn render_session(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let status = session.current_status();
    let now = Local::now();

    let last_checked = match session.last_checked_at() {
        Some(at) => Span::raw(format!(
            "{} ({} ago)",
            format_time(&at),
            format_span(now.signed_duration_since(at))
        )),
        None => Span::styled("pending", Style::default().add_modifier(Modifier::DIM)),
    };

    let transitions = session.history().len().saturating_sub(1);

    let lines = vec![
        Line::from(vec![
            Span::styled("You are currently: ", app.theme.label),
            Span::styled(status.label(), app.theme.status_style(status)),
        ]),
        Line::from(vec![
            Span::styled("Start Time:        ", app.theme.label),
            Span::raw(format!(
                "{} (up {})",
                format_time(&session.session_start()),
                format_span(session.uptime())
            )),
        ]),
        Line::from(vec![Span::styled("Last checked:      ", app.theme.label), last_checked]),
        Line::from(vec![
            Span::styled("Transitions:       ", app.theme.label),
            Span::raw(format!(
                "{} ({} offline)",
                transitions,
                session.history().outage_count()
            )),
        ]),
    ];

    let block = Block::default()
        .title(" Session ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the status bar at the bottom.
///
/// Shows the temporary status message if one is active, otherwise the
/// available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if app.is_live() {
        " ↑↓:select r:check now e:export ?:help q:quit".to_string()
    } else {
        " Scheduler stopped | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " History",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Move selection"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Oldest/newest"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r           Check now"),
        Line::from("  e           Export to JSON"),
        Line::from("  q/Esc       Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
