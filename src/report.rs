//! Reconciliation of cached state with the upstream fetch
//!
//! `Reporter` owns the one pass a single invocation performs: load the record,
//! classify it, optionally fetch, merge the outcome back into the record,
//! persist, and render the status line. Fetch failures are folded into the
//! cached record and re-surfaced for the error cool-down window; storage
//! failures abort immediately and are never recovered from.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::cache::{evaluate, CacheError, CacheRecord, CacheStore, FetchDecision, TtlPolicy};
use crate::fetch::{FetchError, Fetcher, WttrReport};

/// Errors surfaced to the caller of [`Reporter::run`]
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading or writing the cache file failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// This invocation's fetch attempt failed (already recorded in the cache)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A previous failure is still inside its cool-down window
    #[error("{0}")]
    CachedFailure(String),

    /// The cached record claims freshness but carries no payload
    #[error("cached record has no payload to render")]
    MissingPayload,
}

/// Orchestrates one cache-or-fetch pass and renders the status line.
pub struct Reporter<F> {
    store: CacheStore,
    fetcher: F,
    ttl: TtlPolicy,
    location: String,
}

impl<F: Fetcher> Reporter<F> {
    /// Creates a reporter for one location.
    ///
    /// The location is explicit configuration; there is no process-wide
    /// default.
    pub fn new(store: CacheStore, fetcher: F, ttl: TtlPolicy, location: impl Into<String>) -> Self {
        Self {
            store,
            fetcher,
            ttl,
            location: location.into(),
        }
    }

    /// Runs one reconciliation pass at `now` and returns the rendered line.
    ///
    /// At most one load, one fetch, and one save happen per call. A fetch
    /// failure is persisted before it is returned, so subsequent invocations
    /// inside the error TTL reproduce it without contacting the upstream.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<String, ReportError> {
        let mut record: CacheRecord<WttrReport> = self.store.load()?;

        match evaluate(&record, now, &self.ttl) {
            FetchDecision::ServeCachedError(message) => {
                debug!("cached failure still cooling down");
                return Err(ReportError::CachedFailure(message));
            }
            FetchDecision::ServeCached => {
                debug!("cached report still fresh, skipping fetch");
            }
            FetchDecision::Fetch => match self.fetcher.fetch_current(&self.location).await {
                Ok(report) => {
                    debug!("fetch succeeded, replacing cached report");
                    record.record_success(report, now);
                }
                Err(err) => {
                    debug!(error = %err, "fetch failed, entering error cool-down");
                    record.record_failure(err.to_string(), now);
                    self.store.save(&record)?;
                    return Err(err.into());
                }
            },
        }

        // Persisted before rendered. The no-fetch path re-saves the untouched
        // record, keeping TTL windows anchored to the original timestamps.
        self.store.save(&record)?;
        render(&record)
    }
}

/// Renders the status line from the record's payload.
fn render(record: &CacheRecord<WttrReport>) -> Result<String, ReportError> {
    let report = record.payload.as_ref().ok_or(ReportError::MissingPayload)?;
    let current = report.current()?;
    Ok(current.display_line())
}
