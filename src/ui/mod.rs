//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`common`]: Header, session panel, status bar and help overlay
//! - [`history`]: Table of status transitions
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Session (common::render_session)     │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ History (history::render)            │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod common;
pub mod history;
pub mod theme;

pub use theme::Theme;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// Minimum terminal size for usable display
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Render one full frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(6), // Session panel
        Constraint::Min(3),    // History
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_session(frame, app, chunks[1]);
    history::render(frame, app, chunks[2]);
    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

/// Format a wall-clock time like a locale time string.
pub fn format_time(time: &chrono::DateTime<chrono::Local>) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Format a signed span as "1h 2m", "3m 4s" or "5s".
pub fn format_span(span: chrono::Duration) -> String {
    let secs = span.num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::data::{ConnectivityStatus, SessionState};
    use crate::scheduler::{SchedulerControl, SessionFeed};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn render(state: SessionState, width: u16, height: u16) -> String {
        let app = App::with_theme(
            SessionFeed::fixed(state),
            SchedulerControl::disconnected(),
            "http://probe.test/",
            Duration::from_secs(10),
            Theme::dark(),
        );
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_format_span() {
        assert_eq!(format_span(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_span(chrono::Duration::seconds(90)), "1m 30s");
        assert_eq!(format_span(chrono::Duration::seconds(3661)), "1h 1m");
        assert_eq!(format_span(chrono::Duration::seconds(90061)), "1d 1h");
        assert_eq!(format_span(chrono::Duration::seconds(-3)), "0s");
    }

    #[test]
    fn test_draw_shows_status_and_history() {
        let mut state = SessionState::new(ConnectivityStatus::Online);
        state.report_offline();
        let text = render(state, 80, 24);

        assert!(text.contains("OFFLINE"));
        assert!(text.contains("History"));
        assert!(text.contains("online"));
        assert!(text.contains("offline"));
        assert!(text.contains("http://probe.test/"));
    }

    #[test]
    fn test_draw_before_first_check() {
        let text = render(SessionState::new(ConnectivityStatus::Online), 80, 24);
        assert!(text.contains("Last checked"));
        assert!(text.contains("pending"));
    }

    #[test]
    fn test_draw_too_small() {
        let text = render(SessionState::new(ConnectivityStatus::Online), 30, 8);
        assert!(text.contains("Terminal too small"));
    }
}
