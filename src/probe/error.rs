//! Error types for probes.

use std::time::Duration;

use thiserror::Error;

/// Ways a probe can fail.
///
/// Callers treat every variant the same way (the host is offline); the
/// distinction only shows up in logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The request did not settle before the deadline and was aborted.
    #[error("Probe timed out after {0:?}")]
    Timeout(Duration),

    /// Could not establish a connection (DNS, refused, unreachable).
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other request failure.
    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout(_))
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else {
            ProbeError::Http(err.to_string())
        }
    }
}
