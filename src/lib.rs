//! # netwatch
//!
//! A terminal widget and library that shows whether the host currently has
//! network connectivity, with a timestamped history of status transitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌──────────┐    ┌───────────┐    ┌─────────┐    ┌────────┐ │
//! │  │scheduler │───▶│   data    │───▶│   app   │───▶│   ui   │ │
//! │  │ (loop)   │    │ (session) │    │ (state) │    │        │ │
//! │  └────┬─────┘    └───────────┘    └─────────┘    └────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐   ┌─────────┐                                  │
//! │  │ probe   │   │ signal  │◀── RouteSignal | ChannelSignal   │
//! │  │ (HTTP)  │   │ (native)│                                  │
//! │  └─────────┘   └─────────┘                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: [`ConnectivityStatus`], the append-only [`History`] and the
//!   [`SessionState`] state machine
//! - **[`probe`]**: Timeout-bounded HTTP fetch and the [`Prober`] trait
//! - **[`signal`]**: Native reachability notifications ([`ReachabilitySignal`] trait)
//! - **[`scheduler`]**: Polling loop that owns the session and feeds it to the UI
//! - **[`app`]**, **[`events`]**, **[`ui`]**: Terminal presentation using ratatui
//! - **[`config`]**: Layered settings (defaults, TOML file, environment, CLI)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch with defaults (probe every 10s, 5s timeout)
//! netwatch
//!
//! # Probe a custom endpoint
//! netwatch --url http://192.168.1.1/ --interval 5s --timeout 2s
//!
//! # One-shot check for scripts (exit code 0 = online)
//! netwatch --once
//! ```
//!
//! ### As a library
//!
//! ```
//! use netwatch::{ConnectivityStatus, SessionState};
//!
//! let mut session = SessionState::new(ConnectivityStatus::Offline);
//! assert!(session.report_online());
//! assert!(!session.report_online());
//! assert_eq!(session.history().len(), 2);
//! ```
//!
//! ### Driving the scheduler with an injected signal
//!
//! ```no_run
//! use std::sync::Arc;
//! use netwatch::{ChannelSignal, HttpProber, ProbeScheduler};
//!
//! # tokio_test::block_on(async {
//! let (tx, signal) = ChannelSignal::create(true, "embedded");
//! let prober = Arc::new(HttpProber::builder().build().unwrap());
//! let handle = ProbeScheduler::new(prober).spawn(&signal);
//!
//! // The embedding application learned that the link went down
//! tx.send(false).unwrap();
//! # handle.shutdown().await;
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod probe;
pub mod scheduler;
pub mod signal;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{ConfigError, Settings, SettingsOverrides};
pub use data::{ConnectivityStatus, History, HistoryEntry, SessionState};
pub use probe::{fetch_with_timeout, HttpProber, ProbeError, Prober, RequestOptions};
pub use scheduler::{ProbeScheduler, SchedulerControl, SchedulerHandle, SessionFeed};
pub use signal::{ChannelSignal, ReachabilitySignal, RouteSignal};
