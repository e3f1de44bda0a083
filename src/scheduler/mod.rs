//! Periodic ingestion trigger
//!
//! Ingestion runs at fixed hours of the UTC day (by default 00:00, 06:00,
//! 12:00 and 18:00). The loop sleeps until the next slot, runs
//! [`fetch_and_store_articles`], and repeats until the shutdown signal
//! flips. There is no in-process retry: a failed run is simply followed by
//! the next slot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Utc};
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::pipeline::{fetch_and_store_articles, FetchOrchestrator};

/// Fixed hours of the UTC day at which ingestion runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSchedule {
    hours: Vec<u32>,
}

impl IngestSchedule {
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty list or an hour above 23
    pub fn new(hours: &[u32]) -> Result<Self> {
        if hours.is_empty() {
            return Err(Error::config("schedule needs at least one hour"));
        }
        if let Some(hour) = hours.iter().find(|h| **h > 23) {
            return Err(Error::config(format!("schedule hour {hour} is out of range")));
        }

        let mut hours = hours.to_vec();
        hours.sort_unstable();
        hours.dedup();

        Ok(Self { hours })
    }

    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    /// First slot strictly after `now`
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();

        for day in [Some(today), today.checked_add_days(Days::new(1))]
            .into_iter()
            .flatten()
        {
            for hour in &self.hours {
                if let Some(slot) = day.and_hms_opt(*hour, 0, 0).map(|naive| naive.and_utc()) {
                    if slot > now {
                        return slot;
                    }
                }
            }
        }

        now + chrono::Duration::days(1)
    }
}

impl Default for IngestSchedule {
    fn default() -> Self {
        Self {
            hours: vec![0, 6, 12, 18],
        }
    }
}

/// Run ingestion on `schedule` until `shutdown` becomes `true`
pub async fn run_scheduler(
    orchestrator: Arc<FetchOrchestrator>,
    schedule: IngestSchedule,
    run_on_startup: bool,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(hours = ?schedule.hours(), "Scheduler started");

    if run_on_startup && !*shutdown.borrow() {
        fetch_and_store_articles(&orchestrator).await;
    }

    let mut after = Utc::now();

    loop {
        if *shutdown.borrow() {
            break;
        }

        let next = schedule.next_run_after(after);
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tracing::info!(next_run = %next, wait_secs = wait.as_secs(), "Next fetch job scheduled");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                fetch_and_store_articles(&orchestrator).await;
                // never fire the same slot twice, even if the wall clock lags
                after = Utc::now().max(next);
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!("Scheduler stopped");
}
