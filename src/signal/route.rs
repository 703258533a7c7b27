//! OS route-table reachability signal.
//!
//! "Connecting" a UDP socket sends no packets; it only asks the kernel to pick
//! a route. With no usable interface the kernel fails the call with "network
//! unreachable", which is exactly the link-level signal we want.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::ReachabilitySignal;

/// Public address used for the route lookup. Nothing is ever sent to it.
pub const DEFAULT_ROUTE_TARGET: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 53);

/// Returns `true` if the kernel has a route to `target`.
pub fn route_available(target: SocketAddr) -> bool {
    let bind_addr: SocketAddr = if target.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    UdpSocket::bind(bind_addr).and_then(|socket| socket.connect(target)).is_ok()
}

/// Reachability signal backed by periodic route-table checks.
///
/// A background task re-checks every `interval` and publishes only changes.
/// The task stops when the signal is dropped.
#[derive(Debug)]
pub struct RouteSignal {
    receiver: watch::Receiver<bool>,
    description: String,
    task: JoinHandle<()>,
}

impl RouteSignal {
    /// Spawn a route watcher against [`DEFAULT_ROUTE_TARGET`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(interval: Duration) -> Self {
        let target = DEFAULT_ROUTE_TARGET;
        Self::spawn_with(interval, format!("route: {}", target), move || {
            route_available(target)
        })
    }

    /// Spawn a watcher around an arbitrary reachability check.
    pub fn spawn_with<F>(interval: Duration, description: String, check: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        let (tx, rx) = watch::channel(check());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately and the initial value is already published
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }

                let reachable = check();
                let changed = tx.send_if_modified(|current| {
                    if *current != reachable {
                        *current = reachable;
                        true
                    } else {
                        false
                    }
                });
                if changed {
                    debug!(reachable, "route reachability changed");
                }
            }
        });

        Self {
            receiver: rx,
            description,
            task,
        }
    }
}

impl ReachabilitySignal for RouteSignal {
    fn is_reachable(&self) -> bool {
        *self.receiver.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.receiver.clone()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl Drop for RouteSignal {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_loopback_route_always_available() {
        assert!(route_available(SocketAddr::from(([127, 0, 0, 1], 9))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_route_signal_publishes_changes() {
        let up = Arc::new(AtomicBool::new(true));
        let check_flag = up.clone();
        let signal = RouteSignal::spawn_with(Duration::from_secs(1), "fake".to_string(), move || {
            check_flag.load(Ordering::SeqCst)
        });

        assert!(signal.is_reachable());
        let mut rx = signal.subscribe();
        rx.borrow_and_update();

        up.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test(start_paused = true)]
    async fn test_route_signal_is_quiet_without_changes() {
        let signal =
            RouteSignal::spawn_with(Duration::from_secs(1), "fake".to_string(), || true);
        let mut rx = signal.subscribe();
        rx.borrow_and_update();

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(signal.description(), "fake");
    }
}
