//! Article repository: keyed upsert store plus filtered reads
//!
//! Storage sits behind the [`ArticleRepository`] trait so the pipeline and
//! the read API never see SQL:
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │   FetchOrchestrator      │   │      QueryService        │
//! │   (upsert / batch)       │   │   (search / count)       │
//! └────────────┬─────────────┘   └─────────────┬────────────┘
//!              └───────────────┬───────────────┘
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │   ArticleRepository   │
//!                  └───────────┬───────────┘
//!                 ┌────────────┴────────────┐
//!                 ▼                         ▼
//!        ┌─────────────────┐       ┌─────────────────┐
//!        │     SQLite      │       │     Memory      │
//!        └─────────────────┘       └─────────────────┘
//! ```
//!
//! The natural key is `url`. Upserting an existing URL overwrites every
//! content field and `updated_at`; `id` and `created_at` never change.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, types::Value as SqlValue, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::models::{
    format_timestamp, parse_timestamp, Article, NewArticle, StoreReport, UpsertOutcome,
};
use crate::query::{ArticleQuery, Page, SortOrder};

// ============================================================================
// Trait
// ============================================================================

/// Persistent article store keyed by URL
pub trait ArticleRepository: Send + Sync {
    /// Insert or overwrite the article stored under `article.url`
    fn upsert(&self, article: &NewArticle) -> Result<UpsertOutcome>;

    /// Upsert each record independently
    ///
    /// A failing record is logged and counted; the rest of the batch is
    /// still written.
    fn upsert_batch(&self, articles: &[NewArticle]) -> StoreReport {
        let mut report = StoreReport::default();

        for article in articles {
            match self.upsert(article) {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        url = %article.url,
                        source = %article.source,
                        error = %e,
                        "Failed to store article"
                    );
                }
            }
        }

        report
    }

    /// Look up one article by its URL
    fn get_by_url(&self, url: &str) -> Result<Option<Article>>;

    /// Total number of stored articles
    fn count(&self) -> Result<u64>;

    /// One page of articles matching `query`
    fn search(&self, query: &ArticleQuery) -> Result<Page<Article>>;
}

/// Thread-safe shared repository handle
pub type SharedArticleRepository = Arc<dyn ArticleRepository>;

fn poisoned<T>(_: T) -> Error {
    Error::other("article store lock poisoned")
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ============================================================================
// SQLite Implementation
// ============================================================================

const ARTICLE_COLUMNS: &str = "id, url, title, description, source, author, published_at, \
                               category, url_to_image, created_at, updated_at";

/// SQLite implementation of ArticleRepository
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection, which
/// also serializes concurrent upserts of the same URL.
pub struct SqliteArticleRepository {
    conn: Mutex<Connection>,
}

impl SqliteArticleRepository {
    /// Open (or create) the database file at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets API reads proceed while an ingestion run writes
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite article store initialized");
        Ok(repo)
    }

    /// Create in-memory repository (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;
        Ok(repo)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(poisoned)
    }

    fn create_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS articles (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    url TEXT NOT NULL UNIQUE,
                    source TEXT NOT NULL,
                    author TEXT,
                    published_at TEXT,
                    category TEXT NOT NULL DEFAULT 'general',
                    url_to_image TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_articles_title ON articles(title);
                CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category);
                CREATE INDEX IF NOT EXISTS idx_articles_source ON articles(source);
                CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles(published_at);
                CREATE INDEX IF NOT EXISTS idx_articles_author ON articles(author);
                CREATE INDEX IF NOT EXISTS idx_articles_category_source
                    ON articles(category, source);
                "#,
        )?;

        Ok(())
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
        let published_at: Option<String> = row.get(6)?;
        let created_at: String = row.get(9)?;
        let updated_at: String = row.get(10)?;

        Ok(Article {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            source: row.get(4)?,
            author: row.get(5)?,
            published_at: published_at.as_deref().and_then(parse_timestamp),
            category: row.get(7)?,
            url_to_image: row.get(8)?,
            created_at: parse_timestamp(&created_at).unwrap_or_default(),
            updated_at: parse_timestamp(&updated_at).unwrap_or_default(),
        })
    }

    /// `WHERE` clause and its bound values for a query
    fn filter_clause(query: &ArticleQuery) -> (String, Vec<SqlValue>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(text) = &query.text {
            let pattern = like_pattern(text);
            conditions.push(
                "(title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')".to_string(),
            );
            values.push(SqlValue::Text(pattern.clone()));
            values.push(SqlValue::Text(pattern));
        }

        for (column, list) in [("source", &query.sources), ("category", &query.categories)] {
            if !list.is_empty() {
                let placeholders = vec!["?"; list.len()].join(", ");
                conditions.push(format!("{column} IN ({placeholders})"));
                values.extend(list.iter().cloned().map(SqlValue::Text));
            }
        }

        if let Some(date) = query.date {
            conditions.push("date(published_at) = ?".to_string());
            values.push(SqlValue::Text(date.format("%Y-%m-%d").to_string()));
        }

        if let Some(author) = &query.author {
            conditions.push("author LIKE ? ESCAPE '\\'".to_string());
            values.push(SqlValue::Text(like_pattern(author)));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        (clause, values)
    }

    fn order_clause(sort: SortOrder) -> &'static str {
        // SQLite sorts NULL lowest: first ascending, last descending
        match sort {
            SortOrder::Latest => " ORDER BY published_at DESC, id DESC",
            SortOrder::Oldest => " ORDER BY published_at ASC, id ASC",
            SortOrder::Default => " ORDER BY id ASC",
        }
    }
}

impl ArticleRepository for SqliteArticleRepository {
    fn upsert(&self, article: &NewArticle) -> Result<UpsertOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existed: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE url = ?1)",
            params![article.url],
            |row| row.get(0),
        )?;

        let now = format_timestamp(&Utc::now());
        tx.execute(
            "INSERT INTO articles
                (title, description, url, source, author, published_at,
                 category, url_to_image, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                source = excluded.source,
                author = excluded.author,
                published_at = excluded.published_at,
                category = excluded.category,
                url_to_image = excluded.url_to_image,
                updated_at = excluded.updated_at",
            params![
                article.title,
                article.description,
                article.url,
                article.source,
                article.author,
                article.published_at.as_ref().map(format_timestamp),
                article.effective_category(),
                article.url_to_image,
                now,
            ],
        )?;

        tx.commit()?;

        Ok(if existed {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        })
    }

    fn get_by_url(&self, url: &str) -> Result<Option<Article>> {
        let conn = self.lock()?;
        let article = conn
            .query_row(
                &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE url = ?1"),
                params![url],
                Self::row_to_article,
            )
            .optional()?;

        Ok(article)
    }

    fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn search(&self, query: &ArticleQuery) -> Result<Page<Article>> {
        let (clause, mut values) = Self::filter_clause(query);
        let conn = self.lock()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM articles{clause}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles{clause}{} LIMIT ? OFFSET ?",
            Self::order_clause(query.sort)
        );
        values.push(SqlValue::Integer(i64::from(query.per_page)));
        values.push(SqlValue::Integer(
            i64::try_from(query.offset()).unwrap_or(i64::MAX),
        ));

        let mut stmt = conn.prepare(&sql)?;
        let data = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_article)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page::new(
            data,
            query,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    articles: Vec<Article>,
}

/// In-memory implementation of ArticleRepository
///
/// Honors the same contract as the SQLite store; used by tests and the
/// `--memory` CLI flag.
#[derive(Default)]
pub struct MemoryArticleRepository {
    state: RwLock<MemoryState>,
}

impl MemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(article: &Article, query: &ArticleQuery) -> bool {
        let contains = |haystack: Option<&str>, needle: &str| {
            haystack
                .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        };

        if let Some(text) = &query.text {
            if !contains(Some(&article.title), text)
                && !contains(article.description.as_deref(), text)
            {
                return false;
            }
        }

        if !query.sources.is_empty() && !query.sources.contains(&article.source) {
            return false;
        }

        if !query.categories.is_empty() && !query.categories.contains(&article.category) {
            return false;
        }

        if let Some(date) = query.date {
            if article.published_at.map(|ts| ts.date_naive()) != Some(date) {
                return false;
            }
        }

        if let Some(author) = &query.author {
            if !contains(article.author.as_deref(), author) {
                return false;
            }
        }

        true
    }
}

/// Truncate to the second, matching what the SQLite store persists
fn to_stored_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    parse_timestamp(&format_timestamp(&ts)).unwrap_or(ts)
}

impl ArticleRepository for MemoryArticleRepository {
    fn upsert(&self, article: &NewArticle) -> Result<UpsertOutcome> {
        let mut state = self.state.write().map_err(poisoned)?;
        let now = to_stored_precision(Utc::now());

        if let Some(existing) = state.articles.iter_mut().find(|a| a.url == article.url) {
            existing.title = article.title.clone();
            existing.description = Some(article.description.clone());
            existing.source = article.source.clone();
            existing.author = article.author.clone();
            existing.published_at = article.published_at.map(to_stored_precision);
            existing.category = article.effective_category().to_string();
            existing.url_to_image = article.url_to_image.clone();
            existing.updated_at = now;
            return Ok(UpsertOutcome::Updated);
        }

        state.next_id += 1;
        let id = state.next_id;
        state.articles.push(Article {
            id,
            url: article.url.clone(),
            title: article.title.clone(),
            description: Some(article.description.clone()),
            source: article.source.clone(),
            author: article.author.clone(),
            published_at: article.published_at.map(to_stored_precision),
            category: article.effective_category().to_string(),
            url_to_image: article.url_to_image.clone(),
            created_at: now,
            updated_at: now,
        });

        Ok(UpsertOutcome::Created)
    }

    fn get_by_url(&self, url: &str) -> Result<Option<Article>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.articles.iter().find(|a| a.url == url).cloned())
    }

    fn count(&self) -> Result<u64> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.articles.len() as u64)
    }

    fn search(&self, query: &ArticleQuery) -> Result<Page<Article>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut matched: Vec<&Article> = state
            .articles
            .iter()
            .filter(|a| Self::matches(a, query))
            .collect();

        // Option orders None first, as SQLite orders NULL
        match query.sort {
            SortOrder::Latest => {
                matched.sort_by(|a, b| (b.published_at, b.id).cmp(&(a.published_at, a.id)))
            }
            SortOrder::Oldest => {
                matched.sort_by(|a, b| (a.published_at, a.id).cmp(&(b.published_at, b.id)))
            }
            SortOrder::Default => matched.sort_by_key(|a| a.id),
        }

        let total = matched.len() as u64;
        let data = matched
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.per_page as usize)
            .cloned()
            .collect();

        Ok(Page::new(data, query, total))
    }
}

// ============================================================================
// Shared Repository Constructors
// ============================================================================

/// Create a shared SQLite repository
pub fn create_sqlite_repository(path: impl AsRef<Path>) -> Result<SharedArticleRepository> {
    Ok(Arc::new(SqliteArticleRepository::new(path)?))
}

/// Create a shared in-memory repository
pub fn create_memory_repository() -> SharedArticleRepository {
    Arc::new(MemoryArticleRepository::new())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn create_test_repos() -> Vec<Box<dyn ArticleRepository>> {
        vec![
            Box::new(SqliteArticleRepository::in_memory().unwrap()),
            Box::new(MemoryArticleRepository::new()),
        ]
    }

    fn article(url: &str, title: &str) -> NewArticle {
        NewArticle {
            url: url.to_string(),
            title: title.to_string(),
            description: format!("About {title}"),
            source: "NewsAPI".to_string(),
            author: None,
            published_at: None,
            category: "general".to_string(),
            url_to_image: None,
        }
    }

    fn at(day: u32, hour: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 12, day, hour, 0, 0).unwrap())
    }

    fn seed(repo: &dyn ArticleRepository) {
        let rows = [
            ("https://a/1", "Rates hold steady", "NewsAPI", "business", Some("Jane Roe"), at(15, 9)),
            ("https://a/2", "Chip shortage eases", "The Guardian", "technology", Some("Alex Hern"), at(16, 12)),
            ("https://a/3", "Storm warning issued", "The New York Times", "general", None, None),
            ("https://a/4", "Markets 100% up", "The Guardian", "business", Some("jane doe"), at(16, 18)),
            ("https://a/5", "Quiet day in tech", "NewsAPI", "technology", None, at(14, 7)),
        ];

        for (url, title, source, category, author, published_at) in rows {
            let mut record = article(url, title);
            record.source = source.to_string();
            record.category = category.to_string();
            record.author = author.map(str::to_string);
            record.published_at = published_at;
            repo.upsert(&record).unwrap();
        }
    }

    fn urls(page: &Page<Article>) -> Vec<&str> {
        page.data.iter().map(|a| a.url.as_str()).collect()
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        for repo in create_test_repos() {
            let first = article("https://example.com/x", "First title");
            assert_eq!(repo.upsert(&first).unwrap(), UpsertOutcome::Created);

            let stored = repo.get_by_url("https://example.com/x").unwrap().unwrap();

            let mut second = first.clone();
            second.title = "Second title".to_string();
            second.description = "Rewritten".to_string();
            second.author = Some("Desk".to_string());
            second.published_at = at(16, 10);
            second.category = "business".to_string();
            second.url_to_image = Some("https://example.com/x.jpg".to_string());
            assert_eq!(repo.upsert(&second).unwrap(), UpsertOutcome::Updated);

            assert_eq!(repo.count().unwrap(), 1);

            let updated = repo.get_by_url("https://example.com/x").unwrap().unwrap();
            assert_eq!(updated.id, stored.id);
            assert_eq!(updated.created_at, stored.created_at);
            assert_eq!(updated.title, "Second title");
            assert_eq!(updated.description.as_deref(), Some("Rewritten"));
            assert_eq!(updated.author.as_deref(), Some("Desk"));
            assert_eq!(updated.published_at, at(16, 10));
            assert_eq!(updated.category, "business");
            assert_eq!(
                updated.url_to_image.as_deref(),
                Some("https://example.com/x.jpg")
            );
        }
    }

    #[test]
    fn test_distinct_urls_are_distinct_rows() {
        for repo in create_test_repos() {
            let batch: Vec<NewArticle> = (0..7)
                .map(|i| article(&format!("https://example.com/{i}"), "t"))
                .collect();

            let report = repo.upsert_batch(&batch);
            assert_eq!(report.created, 7);
            assert_eq!(report.failed, 0);
            assert_eq!(repo.count().unwrap(), 7);

            let report = repo.upsert_batch(&batch);
            assert_eq!(report.updated, 7);
            assert_eq!(repo.count().unwrap(), 7);
        }
    }

    /// Store that refuses one URL and delegates the rest
    struct RejectingRepository {
        inner: MemoryArticleRepository,
        rejected_url: &'static str,
    }

    impl ArticleRepository for RejectingRepository {
        fn upsert(&self, article: &NewArticle) -> Result<UpsertOutcome> {
            if article.url == self.rejected_url {
                return Err(Error::other("disk full"));
            }
            self.inner.upsert(article)
        }

        fn get_by_url(&self, url: &str) -> Result<Option<Article>> {
            self.inner.get_by_url(url)
        }

        fn count(&self) -> Result<u64> {
            self.inner.count()
        }

        fn search(&self, query: &ArticleQuery) -> Result<Page<Article>> {
            self.inner.search(query)
        }
    }

    #[test]
    fn test_failed_record_does_not_stop_batch() {
        let repo = RejectingRepository {
            inner: MemoryArticleRepository::new(),
            rejected_url: "https://example.com/2",
        };

        let batch = vec![
            article("https://example.com/1", "One"),
            article("https://example.com/2", "Two"),
            article("https://example.com/3", "Three"),
        ];

        let report = repo.upsert_batch(&batch);

        assert_eq!(
            report,
            StoreReport {
                created: 2,
                updated: 0,
                failed: 1
            }
        );
        assert_eq!(repo.count().unwrap(), 2);
        assert!(repo.get_by_url("https://example.com/2").unwrap().is_none());
        assert!(repo.get_by_url("https://example.com/3").unwrap().is_some());
    }

    #[test]
    fn test_blank_category_stored_as_general() {
        for repo in create_test_repos() {
            let mut record = article("https://example.com/c", "t");
            record.category = String::new();
            repo.upsert(&record).unwrap();

            let stored = repo.get_by_url("https://example.com/c").unwrap().unwrap();
            assert_eq!(stored.category, "general");
        }
    }

    #[test]
    fn test_filter_sources_and_category() {
        for repo in create_test_repos() {
            seed(repo.as_ref());

            let query = ArticleQuery {
                sources: vec!["NewsAPI".to_string(), "The Guardian".to_string()],
                ..ArticleQuery::default()
            };
            let page = repo.search(&query).unwrap();
            assert_eq!(urls(&page), vec!["https://a/1", "https://a/2", "https://a/4", "https://a/5"]);

            let query = ArticleQuery {
                categories: vec!["business".to_string()],
                ..query
            };
            let page = repo.search(&query).unwrap();
            assert_eq!(urls(&page), vec!["https://a/1", "https://a/4"]);
            assert_eq!(page.total, 2);
        }
    }

    #[test]
    fn test_text_and_author_are_case_insensitive_substrings() {
        for repo in create_test_repos() {
            seed(repo.as_ref());

            let query = ArticleQuery {
                text: Some("CHIP".to_string()),
                ..ArticleQuery::default()
            };
            assert_eq!(urls(&repo.search(&query).unwrap()), vec!["https://a/2"]);

            // description match
            let query = ArticleQuery {
                text: Some("about storm".to_string()),
                ..ArticleQuery::default()
            };
            assert_eq!(urls(&repo.search(&query).unwrap()), vec!["https://a/3"]);

            let query = ArticleQuery {
                author: Some("JANE".to_string()),
                ..ArticleQuery::default()
            };
            assert_eq!(
                urls(&repo.search(&query).unwrap()),
                vec!["https://a/1", "https://a/4"]
            );
        }
    }

    #[test]
    fn test_like_wildcards_are_literal() {
        for repo in create_test_repos() {
            seed(repo.as_ref());

            let query = ArticleQuery {
                text: Some("100%".to_string()),
                ..ArticleQuery::default()
            };
            assert_eq!(urls(&repo.search(&query).unwrap()), vec!["https://a/4"]);

            let query = ArticleQuery {
                text: Some("_".to_string()),
                ..ArticleQuery::default()
            };
            assert!(repo.search(&query).unwrap().data.is_empty());
        }
    }

    #[test]
    fn test_date_filter() {
        for repo in create_test_repos() {
            seed(repo.as_ref());

            let query = ArticleQuery {
                date: NaiveDate::from_ymd_opt(2024, 12, 16),
                ..ArticleQuery::default()
            };
            assert_eq!(
                urls(&repo.search(&query).unwrap()),
                vec!["https://a/2", "https://a/4"]
            );
        }
    }

    #[test]
    fn test_sort_orders() {
        for repo in create_test_repos() {
            seed(repo.as_ref());

            let latest = repo
                .search(&ArticleQuery {
                    sort: SortOrder::Latest,
                    ..ArticleQuery::default()
                })
                .unwrap();
            assert_eq!(
                urls(&latest),
                vec!["https://a/4", "https://a/2", "https://a/1", "https://a/5", "https://a/3"]
            );

            let oldest = repo
                .search(&ArticleQuery {
                    sort: SortOrder::Oldest,
                    ..ArticleQuery::default()
                })
                .unwrap();
            assert_eq!(
                urls(&oldest),
                vec!["https://a/3", "https://a/5", "https://a/1", "https://a/2", "https://a/4"]
            );
        }
    }

    #[test]
    fn test_pagination() {
        for repo in create_test_repos() {
            seed(repo.as_ref());

            let query = ArticleQuery {
                per_page: 2,
                page: 3,
                ..ArticleQuery::default()
            };
            let page = repo.search(&query).unwrap();
            assert_eq!(urls(&page), vec!["https://a/5"]);
            assert_eq!(page.total, 5);
            assert_eq!(page.last_page, 3);
            assert_eq!(page.from, Some(5));
            assert_eq!(page.to, Some(5));

            let beyond = repo
                .search(&ArticleQuery {
                    page: 9,
                    ..query
                })
                .unwrap();
            assert!(beyond.data.is_empty());
            assert_eq!(beyond.total, 5);
        }
    }

    #[test]
    fn test_like_pattern_escaping() {
        assert_eq!(like_pattern("a%b_c\\"), "%a\\%b\\_c\\\\%");
    }
}
