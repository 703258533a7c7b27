//! History table rendering.
//!
//! One row per status transition, oldest first.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{format_span, format_time};
use crate::app::App;

/// Render the history table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.session.history().entries();
    let now = Local::now();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Time"),
        Cell::from("Status"),
        Cell::from("Lasted"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let end = entries.get(i + 1).map(|next| next.timestamp).unwrap_or(now);
            let lasted = format_span(end.signed_duration_since(entry.timestamp));
            // The newest row is still running
            let lasted = if i + 1 == entries.len() {
                format!("{}+", lasted)
            } else {
                lasted
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(format_time(&entry.timestamp)),
                Cell::from(format!("{} {}", entry.status.icon(), entry.status.label()))
                    .style(app.theme.status_style(entry.status)),
                Cell::from(lasted),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Fill(1),
    ];

    let selected = app.selected_index.min(entries.len().saturating_sub(1));
    let position_info = if !entries.is_empty() {
        format!(" [{}/{}]", selected + 1, entries.len())
    } else {
        String::new()
    };
    let follow_info = if app.follow_latest { "" } else { " [End:follow]" };
    let title = format!(" History ({}){}{} ", entries.len(), position_info, follow_info);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
