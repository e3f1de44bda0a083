//! Error types for provider calls
//!
//! Every way a single (provider, section) call can fail. The orchestrator
//! never propagates these; it logs them and moves on.

use thiserror::Error;

/// Errors that can occur while fetching one section from one provider
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS or body-read failure
    #[error("HTTP transport failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Provider answered with a non-success status code
    #[error("Upstream responded with status {0}")]
    UpstreamStatus(u16),

    /// Body was not the JSON shape the provider documents
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Endpoint could not be built from the configured base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Provider has no API key configured
    #[error("No API key configured for {0}")]
    MissingCredentials(&'static str),
}

impl FetchError {
    /// Short label used as the `kind` field in log events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::Timeout => "transport",
            Self::UpstreamStatus(_) => "upstream",
            Self::MalformedPayload(_) => "payload",
            Self::InvalidUrl(_) | Self::MissingCredentials(_) => "config",
        }
    }

    /// Whether the next scheduled run may succeed without operator action
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::UpstreamStatus(status) => matches!(status, 429 | 500..=599),
            Self::MalformedPayload(_) => true,
            Self::InvalidUrl(_) | Self::MissingCredentials(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::UpstreamStatus(status.as_u16())
        } else {
            Self::Transport(err)
        }
    }
}
