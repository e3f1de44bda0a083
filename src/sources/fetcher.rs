//! Rate-limited JSON fetcher shared by the source adapters
//!
//! One `ApiFetcher` is built per ingestion run and handed to every adapter.
//! It owns:
//! - A reqwest client with the configured per-call timeout and gzip support
//! - A `governor` rate limiter bounding outbound requests per second
//!
//! There is no retry loop. A failed call is reported to the orchestrator,
//! which logs it and moves on; the next scheduled run is the retry.

use crate::config::SourcesConfig;
use crate::utils::error::FetchError;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
};
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use url::Url;

/// HTTP client for provider JSON APIs
pub struct ApiFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    timeout: Duration,
}

impl ApiFetcher {
    /// Create a fetcher with the default user agent
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be created
    pub fn new(requests_per_second: u32, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_user_agent(
            requests_per_second,
            timeout,
            concat!("newsroom/", env!("CARGO_PKG_VERSION")),
        )
    }

    /// Create a fetcher from the `[sources]` configuration table
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be created
    pub fn from_config(config: &SourcesConfig) -> Result<Self, FetchError> {
        Self::with_user_agent(
            config.requests_per_second,
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
        )
    }

    /// Create a fetcher with an explicit user agent
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be created
    pub fn with_user_agent(
        requests_per_second: u32,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Transport)?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            timeout,
        })
    }

    /// Per-call timeout this fetcher was built with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and parse the body as JSON
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` when the call exceeds the client timeout
    /// - `FetchError::Transport` on connection or body-read failure
    /// - `FetchError::UpstreamStatus` on any non-2xx response
    /// - `FetchError::MalformedPayload` when the body is not valid JSON
    pub async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "GET");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = ApiFetcher::new(5, Duration::from_secs(10));
        assert!(fetcher.is_ok());
        assert_eq!(fetcher.unwrap().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_rate_falls_back_to_one() {
        let fetcher = ApiFetcher::new(0, Duration::from_secs(1));
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = crate::config::Config::default();
        let fetcher = ApiFetcher::from_config(&config.sources).unwrap();
        assert_eq!(fetcher.timeout(), config.request_timeout());
    }
}
