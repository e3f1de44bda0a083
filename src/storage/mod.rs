//! Article persistence
//!
//! SQLite is the production store; an in-memory store with the same
//! contract backs tests and throwaway runs.

pub mod repository;

pub use repository::{
    create_memory_repository, create_sqlite_repository, ArticleRepository,
    MemoryArticleRepository, SharedArticleRepository, SqliteArticleRepository,
};

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Open the store selected by configuration
///
/// `in_memory` overrides the configured SQLite path.
pub fn open_repository(config: &DatabaseConfig, in_memory: bool) -> Result<SharedArticleRepository> {
    if in_memory {
        tracing::info!("Using in-memory article store");
        return Ok(create_memory_repository());
    }

    create_sqlite_repository(&config.sqlite_path)
}
