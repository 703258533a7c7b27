//! Reachability probing.
//!
//! A probe is a single best-effort HTTP request whose only interpretation is
//! "it settled without error before the timeout". The [`Prober`] trait lets
//! the scheduler run against a fake in tests.

mod error;
mod fetch;
mod http;

pub use error::ProbeError;
pub use fetch::{fetch_with_timeout, with_timeout, RequestOptions};
pub use http::{HttpProber, DEFAULT_PROBE_URL};

use std::fmt::Debug;

use async_trait::async_trait;

/// Something that can check whether the network is reachable.
#[async_trait]
pub trait Prober: Send + Sync + Debug {
    /// Run one probe. `Ok(())` means online, any error means offline.
    async fn probe(&self) -> Result<(), ProbeError>;

    /// Human-readable description of what is being probed.
    ///
    /// Used for display in the TUI header.
    fn target(&self) -> &str;
}
