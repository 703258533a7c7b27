//! Read-only feed of session snapshots for the presentation layer.

use tokio::sync::watch;

use crate::data::SessionState;

/// Receives session snapshots published by the scheduler.
///
/// `poll` never blocks, so it can be called from a synchronous render loop.
#[derive(Debug)]
pub struct SessionFeed {
    receiver: watch::Receiver<SessionState>,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl SessionFeed {
    pub fn new(receiver: watch::Receiver<SessionState>) -> Self {
        Self {
            receiver,
            initial_returned: false,
        }
    }

    /// A feed that only ever yields `state`.
    pub fn fixed(state: SessionState) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self::new(rx)
    }

    /// Poll for the latest snapshot.
    ///
    /// Returns the current snapshot on the first call, then `Some` only when
    /// the scheduler has published something new.
    pub fn poll(&mut self) -> Option<SessionState> {
        if !self.initial_returned {
            self.initial_returned = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Returns `false` once the scheduler has stopped publishing.
    pub fn is_connected(&self) -> bool {
        self.receiver.has_changed().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ConnectivityStatus;

    #[test]
    fn test_feed_returns_initial_then_changes() {
        let (tx, rx) = watch::channel(SessionState::new(ConnectivityStatus::Online));
        let mut feed = SessionFeed::new(rx);

        assert!(feed.poll().is_some());
        assert!(feed.poll().is_none());

        let mut next = SessionState::new(ConnectivityStatus::Online);
        next.report_offline();
        tx.send(next).unwrap();

        let state = feed.poll().unwrap();
        assert_eq!(state.current_status(), ConnectivityStatus::Offline);
        assert!(feed.is_connected());
    }

    #[test]
    fn test_fixed_feed_disconnected() {
        let mut feed = SessionFeed::fixed(SessionState::new(ConnectivityStatus::Offline));
        let state = feed.poll().unwrap();
        assert_eq!(state.current_status(), ConnectivityStatus::Offline);
        assert!(feed.poll().is_none());
        assert!(!feed.is_connected());
    }
}
