//! Connectivity data model.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "10s", "500ms")
//! - [`history`]: Append-only transition log ([`History`])
//! - [`session`]: The connectivity state machine ([`SessionState`])
//! - [`status`]: [`ConnectivityStatus`] and [`HistoryEntry`]
//!
//! ## Data Flow
//!
//! ```text
//! native signal / probe outcome
//!        │
//!        ▼
//! SessionState::report_online() / report_offline()
//!        │
//!        └──▶ History::record() (only when the status changes)
//! ```

pub mod duration;
pub mod history;
pub mod session;
pub mod status;

pub use history::History;
pub use session::SessionState;
pub use status::{ConnectivityStatus, HistoryEntry};
