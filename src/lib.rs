//! newsroom - News aggregation backend
//!
//! Pulls headlines from several news APIs on a fixed schedule, normalizes
//! them into one article schema, upserts them by URL, and serves a filtered,
//! paginated read API over the result.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`sources`] - Provider adapters (NewsAPI, The Guardian, NYT) and the HTTP fetcher
//! - [`parser`] - Markup stripping and date parsing for provider fields
//! - [`pipeline`] - The fetch-and-store ingestion job
//! - [`storage`] - Article repository (SQLite, in-memory)
//! - [`query`] - Validated list criteria and pagination
//! - [`server`] - axum read API
//! - [`scheduler`] - Fixed-hour ingestion trigger
//! - [`models`] - Core data structures and types
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```no_run
//! use newsroom::config::Config;
//! use newsroom::pipeline::{fetch_and_store_articles, FetchOrchestrator};
//! use newsroom::storage::open_repository;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let repo = open_repository(&config.database, false)?;
//!     let orchestrator = FetchOrchestrator::from_config(&config, repo)?;
//!     fetch_and_store_articles(&orchestrator).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod scheduler;
pub mod server;
pub mod sources;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::{Article, NewArticle, StoreReport, UpsertOutcome};
    pub use crate::pipeline::{FetchOrchestrator, IngestReport};
    pub use crate::query::{ArticleQuery, ListParams, Page, QueryService};
    pub use crate::sources::{ApiFetcher, NewsSource};
    pub use crate::storage::{ArticleRepository, SharedArticleRepository};
}

// Direct re-exports for convenience
pub use models::{Article, NewArticle};
