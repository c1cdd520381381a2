//! Output handler trait
//!
//! The engine reports progress through this trait instead of printing, so
//! runs can be rendered to a console, captured in tests, or silenced.

use crate::engine::{RunReport, SubmissionOutcome};
use crate::state::StatusBuckets;

/// Receives progress events of a run
///
/// Every method defaults to doing nothing. Implementations must be
/// thread-safe.
pub trait OutputHandler: Send + Sync {
    /// A site run started for `site_url`
    fn site_started(&self, _site_url: &str) {}

    /// Sitemap discovery finished
    ///
    /// # Arguments
    ///
    /// * `sitemap_count` - Number of registered sitemaps
    /// * `page_count` - Number of unique pages they list
    fn pages_found(&self, _sitemap_count: usize, _page_count: usize) {}

    /// A chunk of status lookups settled
    fn batch_complete(&self, _batch_index: usize, _batch_count: usize) {}

    /// Every candidate has a resolved status
    fn statuses_resolved(&self, _buckets: &StatusBuckets) {}

    /// The pages that will be submitted for indexing are known
    fn indexable_found(&self, _urls: &[String]) {}

    /// Submission of `url` is starting
    fn submission_started(&self, _url: &str) {}

    /// Submission of `url` finished without a fatal error
    fn submission_finished(&self, _url: &str, _outcome: SubmissionOutcome) {}

    /// The run finished successfully
    fn run_finished(&self, _report: &RunReport) {}
}

/// Output handler that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl OutputHandler for NullOutput {}
