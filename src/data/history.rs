//! Append-only log of connectivity transitions.

use std::ops::Index;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::status::{ConnectivityStatus, HistoryEntry};

/// Ordered record of status transitions for one session.
///
/// Entries are only ever appended, and an entry is only appended when its
/// status differs from the last one, so no two adjacent entries share a
/// status. The log is never truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history seeded with the session's initial status.
    pub fn starting_with(status: ConnectivityStatus, timestamp: DateTime<Local>) -> Self {
        Self {
            entries: vec![HistoryEntry::new(status, timestamp)],
        }
    }

    /// Record a transition to `status`.
    ///
    /// Returns `true` if an entry was appended, `false` if the last entry
    /// already had this status.
    pub fn record(&mut self, status: ConnectivityStatus, timestamp: DateTime<Local>) -> bool {
        if self.last_status() == Some(status) {
            return false;
        }
        self.entries.push(HistoryEntry::new(status, timestamp));
        true
    }

    /// Status of the most recent entry.
    pub fn last_status(&self) -> Option<ConnectivityStatus> {
        self.entries.last().map(|e| e.status)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of transitions into `Offline` (the seed entry counts too).
    pub fn outage_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status == ConnectivityStatus::Offline).count()
    }
}

impl Index<usize> for History {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
