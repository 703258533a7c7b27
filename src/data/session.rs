//! Session state: the connectivity state machine.

use chrono::{DateTime, Local};

use super::history::History;
use super::status::ConnectivityStatus;

/// Mutable root of one monitoring session.
///
/// Only [`report_online`](Self::report_online), [`report_offline`](Self::report_offline)
/// and [`record_check`](Self::record_check) mutate it. Nothing is persisted;
/// the state is discarded when the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    session_start: DateTime<Local>,
    current_status: ConnectivityStatus,
    last_checked_at: Option<DateTime<Local>>,
    history: History,
}

impl SessionState {
    /// Start a session now with the given initial status.
    pub fn new(initial: ConnectivityStatus) -> Self {
        Self::started_at(initial, Local::now())
    }

    /// Start a session at an explicit time.
    ///
    /// The history is seeded with `{initial, session_start}`.
    pub fn started_at(initial: ConnectivityStatus, session_start: DateTime<Local>) -> Self {
        Self {
            session_start,
            current_status: initial,
            last_checked_at: None,
            history: History::starting_with(initial, session_start),
        }
    }

    pub fn session_start(&self) -> DateTime<Local> {
        self.session_start
    }

    pub fn current_status(&self) -> ConnectivityStatus {
        self.current_status
    }

    /// Time of the most recent poll tick, `None` before the first one.
    pub fn last_checked_at(&self) -> Option<DateTime<Local>> {
        self.last_checked_at
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Mark the host as online. Returns `true` if a transition was recorded.
    pub fn report_online(&mut self) -> bool {
        self.report_online_at(Local::now())
    }

    /// Mark the host as offline. Returns `true` if a transition was recorded.
    pub fn report_offline(&mut self) -> bool {
        self.report_offline_at(Local::now())
    }

    pub fn report_online_at(&mut self, at: DateTime<Local>) -> bool {
        self.report(ConnectivityStatus::Online, at)
    }

    pub fn report_offline_at(&mut self, at: DateTime<Local>) -> bool {
        self.report(ConnectivityStatus::Offline, at)
    }

    /// Apply a status report.
    ///
    /// The status assignment is unconditional; the history only grows when
    /// the last entry has a different status.
    pub fn report(&mut self, status: ConnectivityStatus, at: DateTime<Local>) -> bool {
        self.current_status = status;
        self.history.record(status, at)
    }

    /// Stamp the start of a probe attempt.
    pub fn record_check(&mut self) {
        self.record_check_at(Local::now());
    }

    pub fn record_check_at(&mut self, at: DateTime<Local>) {
        self.last_checked_at = Some(at);
    }

    /// How long the session has been running.
    pub fn uptime(&self) -> chrono::Duration {
        Local::now().signed_duration_since(self.session_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use ConnectivityStatus::{Offline, Online};

    #[test]
    fn test_startup_while_offline() {
        let start = Local::now();
        let state = SessionState::started_at(Offline, start);

        assert_eq!(state.current_status(), Offline);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].status, Offline);
        assert_eq!(state.history()[0].timestamp, start);
        assert_eq!(state.session_start(), start);
        assert!(state.last_checked_at().is_none());
    }

    #[test]
    fn test_report_online_twice_appends_once() {
        let mut state = SessionState::new(Offline);

        assert!(state.report_online());
        assert!(!state.report_online());
        assert_eq!(state.current_status(), Online);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_report_offline_twice_appends_once() {
        let mut state = SessionState::new(Online);

        assert!(state.report_offline());
        assert!(!state.report_offline());
        assert_eq!(state.current_status(), Offline);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_repeated_online_while_online_is_ignored() {
        let mut state = SessionState::new(Online);
        for _ in 0..3 {
            state.report_online();
        }
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_record_check_keeps_latest() {
        let start = Local::now();
        let mut state = SessionState::started_at(Online, start);

        let ticks: Vec<_> = (1..=4).map(|i| start + Duration::seconds(10 * i)).collect();
        for tick in &ticks {
            state.record_check_at(*tick);
        }

        assert_eq!(state.last_checked_at(), ticks.last().copied());
        // Checks never touch status or history
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_session_start_is_fixed() {
        let start = Local::now();
        let mut state = SessionState::started_at(Online, start);
        state.report_offline_at(start + Duration::seconds(5));
        state.report_online_at(start + Duration::seconds(9));
        assert_eq!(state.session_start(), start);
    }

    #[test]
    fn test_final_status_matches_last_report() {
        let mut state = SessionState::new(Online);
        state.report_offline();
        state.report_online();
        state.report_offline();
        assert_eq!(state.current_status(), Offline);
        assert_eq!(state.history().last_status(), Some(Offline));
    }
}
