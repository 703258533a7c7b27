//! Timeout-bounded HTTP fetch.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::{Client, Method, Response};

use super::ProbeError;

/// Request options for [`fetch_with_timeout`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    /// A `GET` that bypasses intermediate caches.
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        Self {
            method: Method::GET,
            headers,
        }
    }
}

/// Race `request` against a single countdown of `timeout`.
///
/// If the request settles first its result is returned and the countdown is
/// dropped. If the countdown elapses first the request future is dropped,
/// which aborts whatever it had in flight, and `ProbeError::Timeout` is
/// returned. Both the request and the timer are owned by this call, so
/// neither outlives it on any exit path.
pub async fn with_timeout<F, T, E>(request: F, timeout: Duration) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ProbeError>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(ProbeError::Timeout(timeout)),
    }
}

/// Issue an HTTP request to `url`, aborting it after `timeout`.
///
/// The response status and body are not inspected.
pub async fn fetch_with_timeout(
    client: &Client,
    url: &str,
    timeout: Duration,
    options: &RequestOptions,
) -> Result<Response, ProbeError> {
    let request = client.request(options.method.clone(), url).headers(options.headers.clone());
    with_timeout(request.send(), timeout).await
}
