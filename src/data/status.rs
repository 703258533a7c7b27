//! Connectivity status and history entry types.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Whether the host can currently reach the network.
///
/// There is deliberately no "unknown" or "checking" member: a probe in flight
/// leaves the status unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Online,
    Offline,
}

impl ConnectivityStatus {
    /// Map a reachability flag onto a status.
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            ConnectivityStatus::Online
        } else {
            ConnectivityStatus::Offline
        }
    }

    /// Lowercase label used in tables and `--once` output.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityStatus::Online => "online",
            ConnectivityStatus::Offline => "offline",
        }
    }

    /// Uppercase form used for the terminal window title.
    pub fn title(&self) -> &'static str {
        match self {
            ConnectivityStatus::Online => "ONLINE",
            ConnectivityStatus::Offline => "OFFLINE",
        }
    }

    /// Glyph shown next to the status; filled when online.
    pub fn icon(&self) -> &'static str {
        match self {
            ConnectivityStatus::Online => "●",
            ConnectivityStatus::Offline => "○",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ConnectivityStatus::Online)
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recorded status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub status: ConnectivityStatus,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(status: ConnectivityStatus, timestamp: DateTime<Local>) -> Self {
        Self { status, timestamp }
    }
}
