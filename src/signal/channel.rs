//! Channel-driven reachability signal.
//!
//! Reachability is pushed through a tokio watch channel. Useful when the
//! embedding application already knows about link changes, and in tests.

use tokio::sync::watch;

use super::ReachabilitySignal;

/// A reachability signal fed by a watch channel.
#[derive(Debug)]
pub struct ChannelSignal {
    receiver: watch::Receiver<bool>,
    description: String,
}

impl ChannelSignal {
    /// Wrap the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<bool>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair with the given initial reachability.
    ///
    /// Returns (sender, signal); sending on the sender flips the signal.
    pub fn create(initial: bool, source_description: &str) -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(initial);
        (tx, Self::new(rx, source_description))
    }
}

impl ReachabilitySignal for ChannelSignal {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_signal_initial_value() {
        let (_tx, signal) = ChannelSignal::create(false, "test");
        assert!(!signal.is_reachable());
        assert_eq!(signal.description(), "channel: test");
    }

    #[tokio::test]
    async fn test_channel_signal_notifies_subscribers() {
        let (tx, signal) = ChannelSignal::create(true, "test");
        let mut rx = signal.subscribe();
        rx.borrow_and_update();

        tx.send(false).unwrap();
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
        assert!(!signal.is_reachable());
    }
}
