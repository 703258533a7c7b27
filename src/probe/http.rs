//! HTTP reachability probe.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{fetch_with_timeout, ProbeError, Prober, RequestOptions};

/// Well-known endpoint that answers `204 No Content` to anyone.
pub const DEFAULT_PROBE_URL: &str = "https://connectivitycheck.gstatic.com/generate_204";

/// Probes a fixed URL with a bounded-latency request.
///
/// Any response at all, regardless of status code, counts as reachable.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use netwatch::probe::{HttpProber, Prober};
///
/// # tokio_test::block_on(async {
/// let prober = HttpProber::builder()
///     .url("https://example.com/")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
///
/// let online = prober.probe().await.is_ok();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    url: String,
    timeout: Duration,
    options: RequestOptions,
}

impl HttpProber {
    /// Create a new builder for configuring the prober.
    pub fn builder() -> HttpProberBuilder {
        HttpProberBuilder::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self) -> Result<(), ProbeError> {
        let response = fetch_with_timeout(&self.client, &self.url, self.timeout, &self.options).await?;
        debug!(url = %self.url, status = %response.status(), "probe settled");
        Ok(())
    }

    fn target(&self) -> &str {
        &self.url
    }
}

/// Builder for [`HttpProber`].
#[derive(Debug, Clone)]
pub struct HttpProberBuilder {
    url: String,
    timeout: Duration,
    options: RequestOptions,
}

impl Default for HttpProberBuilder {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROBE_URL.to_string(),
            timeout: Duration::from_millis(5000),
            options: RequestOptions::default(),
        }
    }
}

impl HttpProberBuilder {
    /// Set the URL to probe.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the probe timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the request options (method, headers).
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the prober.
    pub fn build(self) -> Result<HttpProber, ProbeError> {
        let client = Client::builder().build()?;
        Ok(HttpProber {
            client,
            url: self.url,
            timeout: self.timeout,
            options: self.options,
        })
    }
}
