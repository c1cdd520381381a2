//! Engine module for reconciliation and submission
//!
//! This module contains the core run logic, including:
//! - Chunked concurrent execution of status lookups
//! - Cache-aware status reconciliation
//! - Sequential, rate-limit aware indexing requests
//! - Overall run coordination

mod batch;
mod reconciler;
mod submitter;

pub use batch::BatchRunner;
pub use reconciler::{Reconciliation, StatusReconciler};
pub use submitter::{IndexRequestSubmitter, SubmissionOutcome, SubmissionReport};

use crate::cache::RecheckPolicy;
use crate::config::{RunConfig, RunInput};
use crate::gsc::{
    GscClient, IndexRequester, PageStatusFetcher, PublishMetadataFetcher, SitemapSource,
    TokenProvider,
};
use crate::input::read_csv_urls;
use crate::output::OutputHandler;
use crate::state::StatusBuckets;
use crate::url::{cache_path, convert_to_site_url};
use crate::{ReindexError, Result};
use std::path::Path;

/// The external collaborators a run talks to
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub tokens: &'a dyn TokenProvider,
    pub sitemaps: &'a dyn SitemapSource,
    pub statuses: &'a dyn PageStatusFetcher,
    pub metadata: &'a dyn PublishMetadataFetcher,
    pub indexer: &'a dyn IndexRequester,
}

impl<'a> Services<'a> {
    /// Uses `client` for every Search Console call
    pub fn from_client(tokens: &'a dyn TokenProvider, client: &'a GscClient) -> Self {
        Self {
            tokens,
            sitemaps: client,
            statuses: client,
            metadata: client,
            indexer: client,
        }
    }
}

/// What a successful run observed and did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Search Console property, `None` for CSV input
    pub site_url: Option<String>,

    /// Sitemaps registered for the property
    pub sitemaps: Vec<String>,

    /// Pages grouped by status; empty for CSV input
    pub buckets: StatusBuckets,

    /// Pages handed to the submitter, in order
    pub indexable: Vec<String>,

    pub submission: SubmissionReport,
}

/// Runs a complete reconciliation and submission pass
///
/// For site input the registered sitemaps are enumerated and every page is
/// reconciled against the site's status cache before the indexable ones are
/// submitted. CSV input skips discovery and the cache: every listed URL is
/// submitted.
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `services` - Search Console collaborators
/// * `output` - Receives progress events
///
/// # Returns
///
/// * `Ok(RunReport)` - Every indexable page was handled
/// * `Err(ReindexError)` - The run stopped; `RateLimited` means try again later
pub async fn run(
    config: &RunConfig,
    services: &Services<'_>,
    output: &dyn OutputHandler,
) -> Result<RunReport> {
    let token = services.tokens.get_access_token().await?;
    let mut report = RunReport::default();

    match &config.input {
        RunInput::Site(input) => {
            let site_url = convert_to_site_url(input);
            tracing::info!("Processing site: {}", site_url);
            output.site_started(&site_url);

            let discovered = services.sitemaps.get_sitemap_pages(&token, &site_url).await?;
            if discovered.sitemaps.is_empty() {
                return Err(ReindexError::NoSitemaps { site_url });
            }
            tracing::info!(
                "Found {} pages in {} sitemaps",
                discovered.pages.len(),
                discovered.sitemaps.len()
            );
            output.pages_found(discovered.sitemaps.len(), discovered.pages.len());

            let settings = &config.settings;
            let reconciler = StatusReconciler::new(
                services.statuses,
                RecheckPolicy::from_ttl_days(settings.cache.ttl_days),
                BatchRunner::new(settings.batch.size),
            );
            let reconciliation = reconciler
                .reconcile_site(
                    &token,
                    &site_url,
                    &discovered.pages,
                    &cache_path(Path::new(&settings.cache.dir), &site_url),
                    output,
                )
                .await?;
            output.statuses_resolved(&reconciliation.buckets);

            report.site_url = Some(site_url);
            report.sitemaps = discovered.sitemaps;
            report.buckets = reconciliation.buckets;
            report.indexable = reconciliation.indexable;
        }
        RunInput::Csv(path) => {
            tracing::info!("Reading URLs from {}", path.display());
            report.indexable = read_csv_urls(path)?;
        }
    }

    output.indexable_found(&report.indexable);

    let submitter = IndexRequestSubmitter::new(services.metadata, services.indexer);
    report.submission = submitter
        .submit_all(&token, &report.indexable, output)
        .await?;

    tracing::info!(
        "Run finished: {} requested, {} already requested, {} skipped",
        report.submission.requested.len(),
        report.submission.already_requested.len(),
        report.submission.skipped.len()
    );
    output.run_finished(&report);

    Ok(report)
}
