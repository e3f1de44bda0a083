//! Unified error handling for the newsroom crate
//!
//! Provider calls fail with [`FetchError`](crate::utils::error::FetchError),
//! which the ingestion pipeline logs and swallows. Storage, filesystem and
//! configuration failures funnel into [`Error`].

use std::io;
use thiserror::Error;

/// Unified error type for the newsroom crate
#[derive(Error, Debug)]
pub enum Error {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other(context.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
