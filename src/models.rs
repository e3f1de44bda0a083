// Core data structures for newsroom

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned when a record arrives without one
pub const DEFAULT_CATEGORY: &str = "general";

/// Placeholder stored when a provider omits the headline
pub const PLACEHOLDER_TITLE: &str = "No Title";

/// Placeholder stored when a provider omits the summary
pub const PLACEHOLDER_DESCRIPTION: &str = "No Description";

/// Canonical timestamp format used for persistence (UTC, second precision)
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stored news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub source: String, // Provider display name, e.g. "The Guardian"
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub category: String,
    pub url_to_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized article produced by a source adapter, ready to upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub category: String,
    pub url_to_image: Option<String>,
}

impl NewArticle {
    /// Category to persist, falling back to [`DEFAULT_CATEGORY`] when blank
    pub fn effective_category(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        }
    }
}

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Per-batch storage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreReport {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl StoreReport {
    /// Record one upsert outcome
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    /// Number of records that reached the store
    pub fn stored(&self) -> usize {
        self.created + self.updated
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: StoreReport) {
        self.created += other.created;
        self.updated += other.updated;
        self.failed += other.failed;
    }
}

/// Format a timestamp in the canonical persisted form
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(CANONICAL_TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp previously written by [`format_timestamp`]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, CANONICAL_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
