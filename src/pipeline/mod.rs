//! Fetch-and-store ingestion job
//!
//! # Architecture
//!
//! ```text
//!                      ┌──────────────────────┐
//!                      │  FetchOrchestrator   │
//!                      └──────────┬───────────┘
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │ NewsAPI task│      │Guardian task│      │  NYT task   │   one tokio task
//!     └──────┬──────┘      └──────┬──────┘      └──────┬──────┘   per provider
//!            │ section by section │                    │
//!            ▼                    ▼                    ▼
//!      fetch → normalize → upsert_batch (blocking pool) → report
//! ```
//!
//! Failures are contained at three levels:
//! - a (provider, section) call that fails is logged and yields nothing
//! - a provider task that panics is logged; sibling providers keep going
//! - [`fetch_and_store_articles`] catches anything that escapes the run
//!
//! Re-running the job is always safe: storage is an upsert keyed by URL.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use futures::FutureExt;
use serde::Serialize;

use crate::config::Config;
use crate::models::{NewArticle, StoreReport};
use crate::sources::{self, ApiFetcher, NewsSource};
use crate::storage::SharedArticleRepository;

// ============================================================================
// Reports
// ============================================================================

/// Outcome of one provider's pass over all sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderReport {
    pub provider: String,
    pub sections_succeeded: usize,
    pub sections_failed: usize,
    /// Normalized records received from the provider
    pub fetched: usize,
    pub store: StoreReport,
    /// The provider task panicked; counts cover only what ran before it
    pub crashed: bool,
}

impl ProviderReport {
    fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            ..Self::default()
        }
    }
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub providers: Vec<ProviderReport>,
    pub elapsed_ms: u64,
}

impl IngestReport {
    /// Storage counters summed over every provider
    pub fn store(&self) -> StoreReport {
        self.providers.iter().fold(StoreReport::default(), |mut acc, p| {
            acc.merge(p.store);
            acc
        })
    }

    pub fn fetched(&self) -> usize {
        self.providers.iter().map(|p| p.fetched).sum()
    }

    pub fn sections_failed(&self) -> usize {
        self.providers.iter().map(|p| p.sections_failed).sum()
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderReport> {
        self.providers.iter().find(|p| p.provider == name)
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs every configured provider over every configured section
pub struct FetchOrchestrator {
    sources: Vec<Arc<dyn NewsSource>>,
    fetcher: Arc<ApiFetcher>,
    repo: SharedArticleRepository,
    sections: Vec<String>,
}

impl FetchOrchestrator {
    pub fn new(
        sources: Vec<Arc<dyn NewsSource>>,
        fetcher: Arc<ApiFetcher>,
        repo: SharedArticleRepository,
        sections: Vec<String>,
    ) -> Self {
        Self {
            sources,
            fetcher,
            repo,
            sections,
        }
    }

    /// Build providers and the shared fetcher from configuration
    pub fn from_config(config: &Config, repo: SharedArticleRepository) -> anyhow::Result<Self> {
        let sources = sources::from_config(&config.sources)
            .context("Failed to build news providers")?;
        let fetcher = ApiFetcher::from_config(&config.sources)
            .context("Failed to build HTTP client")?;

        Ok(Self::new(
            sources,
            Arc::new(fetcher),
            repo,
            config.sources.sections.clone(),
        ))
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.display_name()).collect()
    }

    /// Run one ingestion pass
    ///
    /// Never fails: every error is logged and reflected in the report.
    pub async fn run(&self) -> IngestReport {
        let started = Instant::now();

        if self.sources.is_empty() {
            tracing::warn!("No news providers configured, nothing to fetch");
        }

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let fetcher = Arc::clone(&self.fetcher);
                let repo = Arc::clone(&self.repo);
                let sections = self.sections.clone();
                let name = source.display_name();

                let handle = tokio::spawn(async move {
                    run_provider(source.as_ref(), &fetcher, repo, &sections).await
                });
                (name, handle)
            })
            .collect();

        let mut report = IngestReport::default();
        for (name, handle) in handles {
            match handle.await {
                Ok(provider_report) => report.providers.push(provider_report),
                Err(e) => {
                    tracing::error!(provider = name, error = %e, "Provider task failed");
                    report.providers.push(ProviderReport {
                        crashed: true,
                        ..ProviderReport::new(name)
                    });
                }
            }
        }

        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        report
    }
}

/// Fetch every section of one provider, in order
async fn run_provider(
    source: &dyn NewsSource,
    fetcher: &ApiFetcher,
    repo: SharedArticleRepository,
    sections: &[String],
) -> ProviderReport {
    let provider = source.display_name();
    let mut report = ProviderReport::new(provider);

    tracing::info!(provider, sections = sections.len(), "Fetching provider");

    for section in sections {
        tracing::info!(provider, section = %section, "Fetching section");

        let articles = match source.fetch_section(fetcher, section).await {
            Ok(articles) => articles,
            Err(e) => {
                report.sections_failed += 1;
                if e.is_recoverable() {
                    tracing::warn!(provider, section = %section, kind = e.kind(), error = %e, "Section fetch failed");
                } else {
                    tracing::error!(provider, section = %section, kind = e.kind(), error = %e, "Section fetch failed");
                }
                continue;
            }
        };

        let fetched = articles.len();
        let stored = store_batch(Arc::clone(&repo), articles).await;

        report.sections_succeeded += 1;
        report.fetched += fetched;
        report.store.merge(stored);

        tracing::info!(
            provider,
            section = %section,
            fetched,
            created = stored.created,
            updated = stored.updated,
            failed = stored.failed,
            "Section stored"
        );
    }

    report
}

/// Upsert on the blocking pool; SQLite calls are synchronous
async fn store_batch(repo: SharedArticleRepository, articles: Vec<NewArticle>) -> StoreReport {
    let count = articles.len();
    match tokio::task::spawn_blocking(move || repo.upsert_batch(&articles)).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, records = count, "Storage task failed");
            StoreReport {
                failed: count,
                ..StoreReport::default()
            }
        }
    }
}

/// Scheduled job entry point
///
/// Logs start and completion and contains any panic that escapes the run,
/// so a trigger loop calling this never dies with it.
pub async fn fetch_and_store_articles(orchestrator: &FetchOrchestrator) -> Option<IngestReport> {
    tracing::info!(
        providers = orchestrator.sources.len(),
        sections = orchestrator.sections.len(),
        "fetch job started"
    );

    match AssertUnwindSafe(orchestrator.run()).catch_unwind().await {
        Ok(report) => {
            let store = report.store();
            tracing::info!(
                fetched = report.fetched(),
                created = store.created,
                updated = store.updated,
                failed = store.failed,
                sections_failed = report.sections_failed(),
                elapsed_ms = report.elapsed_ms,
                "fetch job completed"
            );
            Some(report)
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(error = %message, "fetch job aborted");
            None
        }
    }
}
