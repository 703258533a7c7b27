//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::data::{ConnectivityStatus, HistoryEntry, SessionState};
use crate::scheduler::{SchedulerControl, SessionFeed};
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    feed: SessionFeed,
    control: SchedulerControl,
    pub session: SessionState,
    pub probe_target: String,
    pub poll_interval: Duration,

    // Navigation state (index into the history table)
    pub selected_index: usize,
    /// Keep the selection on the newest row as history grows.
    pub follow_latest: bool,

    // UI
    pub theme: Theme,
    applied_title: Option<ConnectivityStatus>,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `feed`.
    ///
    /// The theme is detected once here and not re-evaluated.
    pub fn new(
        feed: SessionFeed,
        control: SchedulerControl,
        probe_target: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self::with_theme(feed, control, probe_target, poll_interval, Theme::auto_detect())
    }

    pub fn with_theme(
        mut feed: SessionFeed,
        control: SchedulerControl,
        probe_target: impl Into<String>,
        poll_interval: Duration,
        theme: Theme,
    ) -> Self {
        let session = feed
            .poll()
            .unwrap_or_else(|| SessionState::new(ConnectivityStatus::Offline));
        let selected_index = session.history().len().saturating_sub(1);

        Self {
            running: true,
            show_help: false,
            feed,
            control,
            session,
            probe_target: probe_target.into(),
            poll_interval,
            selected_index,
            follow_latest: true,
            theme,
            applied_title: None,
            status_message: None,
        }
    }

    /// Pull the latest session snapshot, if any.
    ///
    /// Returns `true` if the session changed.
    pub fn refresh(&mut self) -> bool {
        let Some(session) = self.feed.poll() else {
            return false;
        };
        self.session = session;

        let last = self.session.history().len().saturating_sub(1);
        if self.follow_latest {
            self.selected_index = last;
        } else {
            self.selected_index = self.selected_index.min(last);
        }
        true
    }

    /// Whether the scheduler is still publishing.
    pub fn is_live(&self) -> bool {
        self.feed.is_connected()
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.session.current_status()
    }

    /// Window title to apply, if it differs from the last one applied.
    ///
    /// The title is a pure function of the current status.
    pub fn take_pending_title(&mut self) -> Option<&'static str> {
        let status = self.status();
        if self.applied_title == Some(status) {
            return None;
        }
        self.applied_title = Some(status);
        Some(status.title())
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Ask the scheduler for an immediate probe.
    pub fn request_check(&mut self) {
        if self.control.probe_now() {
            self.set_status_message("Checking connectivity...".to_string());
        } else {
            self.set_status_message("Scheduler is not running".to_string());
        }
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.session.history().len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
        self.follow_latest = self.selected_index == max;
    }

    /// Move selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
        let max = self.session.history().len().saturating_sub(1);
        self.follow_latest = self.selected_index == max;
    }

    /// Jump to the oldest entry.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.follow_latest = self.session.history().len() <= 1;
    }

    /// Jump to the newest entry and keep following it.
    pub fn select_last(&mut self) {
        self.selected_index = self.session.history().len().saturating_sub(1);
        self.follow_latest = true;
    }

    /// The currently selected history entry.
    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.session.history().entries().get(self.selected_index)
    }

    /// How long the selected entry's status lasted (or has lasted so far).
    pub fn selected_span(&self) -> Option<chrono::Duration> {
        let entries = self.session.history().entries();
        let entry = entries.get(self.selected_index)?;
        let end = entries
            .get(self.selected_index + 1)
            .map(|next| next.timestamp)
            .unwrap_or_else(Local::now);
        Some(end.signed_duration_since(entry.timestamp))
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the session and its history to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let export = SessionExport::from_app(self);
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// JSON document written by [`App::export_state`].
#[derive(Debug, Serialize)]
struct SessionExport<'a> {
    probe_url: &'a str,
    session_start: DateTime<Local>,
    current_status: ConnectivityStatus,
    last_checked_at: Option<DateTime<Local>>,
    transitions: usize,
    history: &'a [HistoryEntry],
}

impl<'a> SessionExport<'a> {
    fn from_app(app: &'a App) -> Self {
        let session = &app.session;
        Self {
            probe_url: &app.probe_target,
            session_start: session.session_start(),
            current_status: session.current_status(),
            last_checked_at: session.last_checked_at(),
            transitions: session.history().len().saturating_sub(1),
            history: session.history().entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use tokio::sync::watch;

    fn session_with_flaps() -> SessionState {
        let start = Local::now();
        let mut state = SessionState::started_at(ConnectivityStatus::Online, start);
        state.report_offline_at(start + chrono::Duration::seconds(5));
        state.report_online_at(start + chrono::Duration::seconds(12));
        state.record_check_at(start + chrono::Duration::seconds(10));
        state
    }

    fn test_app(state: SessionState) -> App {
        App::with_theme(
            SessionFeed::fixed(state),
            SchedulerControl::disconnected(),
            "http://example.com/",
            Duration::from_secs(10),
            Theme::dark(),
        )
    }

    #[test]
    fn test_new_app_selects_latest_entry() {
        let app = test_app(session_with_flaps());
        assert!(app.running);
        assert_eq!(app.selected_index, 2);
        assert!(app.follow_latest);
        assert_eq!(app.status(), ConnectivityStatus::Online);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut app = test_app(session_with_flaps());

        app.select_first();
        assert_eq!(app.selected_index, 0);
        assert!(!app.follow_latest);

        app.select_prev();
        assert_eq!(app.selected_index, 0);

        app.select_next_n(10);
        assert_eq!(app.selected_index, 2);
        assert!(app.follow_latest);
    }

    #[test]
    fn test_refresh_follows_latest() {
        let start = Local::now();
        let (tx, rx) = watch::channel(SessionState::started_at(ConnectivityStatus::Online, start));
        let mut app = App::with_theme(
            SessionFeed::new(rx),
            SchedulerControl::disconnected(),
            "fake",
            Duration::from_secs(10),
            Theme::dark(),
        );
        assert!(!app.refresh());

        let mut next = app.session.clone();
        next.report_offline_at(start + chrono::Duration::seconds(1));
        tx.send(next).unwrap();

        assert!(app.refresh());
        assert_eq!(app.status(), ConnectivityStatus::Offline);
        assert_eq!(app.selected_index, 1);
        assert!(app.is_live());
    }

    #[test]
    fn test_refresh_keeps_manual_selection() {
        let start = Local::now();
        let (tx, rx) = watch::channel(SessionState::started_at(ConnectivityStatus::Online, start));
        let mut app = App::with_theme(
            SessionFeed::new(rx),
            SchedulerControl::disconnected(),
            "fake",
            Duration::from_secs(10),
            Theme::dark(),
        );

        let mut next = app.session.clone();
        next.report_offline_at(start + chrono::Duration::seconds(1));
        next.report_online_at(start + chrono::Duration::seconds(2));
        tx.send(next).unwrap();
        app.refresh();
        app.select_first();

        let mut next = app.session.clone();
        next.report_offline_at(start + chrono::Duration::seconds(3));
        tx.send(next).unwrap();
        app.refresh();

        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_pending_title_only_on_change() {
        let start = Local::now();
        let (tx, rx) = watch::channel(SessionState::started_at(ConnectivityStatus::Online, start));
        let mut app = App::with_theme(
            SessionFeed::new(rx),
            SchedulerControl::disconnected(),
            "fake",
            Duration::from_secs(10),
            Theme::dark(),
        );

        assert_eq!(app.take_pending_title(), Some("ONLINE"));
        assert_eq!(app.take_pending_title(), None);

        let mut next = app.session.clone();
        next.report_offline();
        tx.send(next).unwrap();
        app.refresh();

        assert_eq!(app.take_pending_title(), Some("OFFLINE"));
    }

    #[test]
    fn test_selected_span() {
        let app = test_app(session_with_flaps());
        let mut app = app;
        app.selected_index = 1;
        assert_eq!(app.selected_span(), Some(chrono::Duration::seconds(7)));
    }

    #[test]
    fn test_request_check_without_scheduler() {
        let mut app = test_app(session_with_flaps());
        app.request_check();
        assert_eq!(app.get_status_message(), Some("Scheduler is not running"));
    }

    #[test]
    fn test_export_state() {
        let app = test_app(session_with_flaps());
        let file = NamedTempFile::new().unwrap();

        app.export_state(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["probe_url"], "http://example.com/");
        assert_eq!(value["current_status"], "online");
        assert_eq!(value["transitions"], 2);
        assert_eq!(value["history"].as_array().unwrap().len(), 3);
        assert_eq!(value["history"][1]["status"], "offline");
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = test_app(session_with_flaps());
        app.toggle_help();
        assert!(app.show_help);
        app.quit();
        assert!(!app.running);
    }
}
