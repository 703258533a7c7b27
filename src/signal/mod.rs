//! Native reachability signal abstraction.
//!
//! The OS can tell us whether the host has a route to the outside world, which
//! is cheaper and faster than an HTTP probe but weaker: a route does not mean
//! a remote host actually answers. The scheduler uses this signal as a fast
//! path and the HTTP probe as ground truth.

mod channel;
mod route;

pub use channel::ChannelSignal;
pub use route::{route_available, RouteSignal, DEFAULT_ROUTE_TARGET};

use std::fmt::Debug;

use tokio::sync::watch;

/// Source of "became reachable" / "became unreachable" notifications.
///
/// # Example
///
/// ```
/// use netwatch::signal::{ChannelSignal, ReachabilitySignal};
///
/// let (tx, signal) = ChannelSignal::create(true, "test");
/// assert!(signal.is_reachable());
///
/// tx.send(false).unwrap();
/// assert!(!signal.is_reachable());
/// ```
pub trait ReachabilitySignal: Send + Sync + Debug {
    /// Current reachability, sampled without blocking.
    fn is_reachable(&self) -> bool;

    /// Subscribe to reachability changes.
    ///
    /// The receiver yields a new value only when reachability flips.
    fn subscribe(&self) -> watch::Receiver<bool>;

    /// Returns a human-readable description of the signal.
    fn description(&self) -> &str;
}
