//! Status reconciliation
//!
//! Every candidate page is either trusted from the status cache or looked up
//! again through the `PageStatusFetcher`. Lookups run through the
//! `BatchRunner`; results are folded into the cache and the status buckets
//! in candidate order once every batch has settled, and the cache is then
//! written back in full.

use crate::cache::{RecheckPolicy, StatusCache, StatusRecord};
use crate::engine::BatchRunner;
use crate::gsc::{AccessToken, PageStatusFetcher};
use crate::output::OutputHandler;
use crate::state::StatusBuckets;
use crate::{ReindexError, Result};
use chrono::Utc;
use std::path::Path;

/// How a candidate's status was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    /// The cached record was still trustworthy
    Cached(String),

    /// The status was looked up again
    Fetched(StatusRecord),
}

/// Outcome of reconciling a site's pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Pages grouped by resolved status, in first-seen status order
    pub buckets: StatusBuckets,

    /// Pages whose status makes them worth submitting, in bucket order
    pub indexable: Vec<String>,

    /// Number of statuses looked up through the fetcher
    pub fetched: usize,

    /// Number of statuses reused from the cache
    pub cached: usize,
}

/// Resolves the indexing status of candidate pages
pub struct StatusReconciler<'a> {
    fetcher: &'a dyn PageStatusFetcher,
    policy: RecheckPolicy,
    runner: BatchRunner,
}

impl<'a> StatusReconciler<'a> {
    pub fn new(
        fetcher: &'a dyn PageStatusFetcher,
        policy: RecheckPolicy,
        runner: BatchRunner,
    ) -> Self {
        Self {
            fetcher,
            policy,
            runner,
        }
    }

    /// Loads the cache at `cache_path`, reconciles `candidates`, and saves it
    ///
    /// # Errors
    ///
    /// * A corrupt cache file fails before any lookup is made.
    /// * A failed lookup aborts the run; the cache file is left untouched.
    pub async fn reconcile_site(
        &self,
        token: &AccessToken,
        site_url: &str,
        candidates: &[String],
        cache_path: &Path,
        output: &dyn OutputHandler,
    ) -> Result<Reconciliation> {
        let mut cache = StatusCache::load(cache_path)?;
        self.reconcile(token, site_url, candidates, &mut cache, output)
            .await
    }

    /// Reconciles `candidates` against `cache` and persists the result
    pub async fn reconcile(
        &self,
        token: &AccessToken,
        site_url: &str,
        candidates: &[String],
        cache: &mut StatusCache,
        output: &dyn OutputHandler,
    ) -> Result<Reconciliation> {
        let now = Utc::now();
        let snapshot: &StatusCache = cache;

        let resolutions = self
            .runner
            .run(
                |url| async move {
                    if let Some(record) = snapshot.get(url) {
                        if !self.policy.should_recheck_at(record, now) {
                            return Ok(Resolution::Cached(record.status.clone()));
                        }
                    }

                    let status = self
                        .fetcher
                        .get_page_indexing_status(token, site_url, url)
                        .await?;
                    tracing::debug!("{}: {}", url, status);
                    Ok::<_, ReindexError>(Resolution::Fetched(StatusRecord::new(status)))
                },
                candidates,
                |batch_index, batch_count| {
                    tracing::info!("Batch {} of {} complete", batch_index + 1, batch_count);
                    output.batch_complete(batch_index, batch_count);
                },
            )
            .await?;

        let mut reconciliation = Reconciliation::default();
        for (url, resolution) in candidates.iter().zip(resolutions) {
            match resolution {
                Resolution::Cached(status) => {
                    reconciliation.cached += 1;
                    reconciliation.buckets.push(&status, url.as_str());
                }
                Resolution::Fetched(record) => {
                    reconciliation.fetched += 1;
                    reconciliation.buckets.push(&record.status, url.as_str());
                    cache.insert(url.as_str(), record);
                }
            }
        }

        cache.save()?;
        reconciliation.indexable = reconciliation.buckets.indexable_pages();

        tracing::info!(
            "Resolved {} pages ({} looked up, {} from cache), {} indexable",
            candidates.len(),
            reconciliation.fetched,
            reconciliation.cached,
            reconciliation.indexable.len()
        );

        Ok(reconciliation)
    }
}
