//! Sequential indexing-request submission
//!
//! Pages are handled strictly one at a time, in list order, because the
//! Indexing API enforces a tight global quota. For each page the publish
//! metadata is read first:
//!
//! | Metadata | Action |
//! |----------|--------|
//! | 404 | Submit an indexing request |
//! | < 400 | Already requested, nothing to do |
//! | 429 | Read rate limit (60/second), stop the run |
//! | other | Skip the page |
//!
//! An indexing request answered with 429 is the publish rate limit
//! (200/day) and also stops the run. Any other answer >= 400 skips the page.

use crate::gsc::{AccessToken, IndexRequester, PublishMetadataFetcher};
use crate::output::OutputHandler;
use crate::{RateLimitKind, ReindexError, Result};

const HTTP_NOT_FOUND: u16 = 404;
const HTTP_TOO_MANY_REQUESTS: u16 = 429;
const HTTP_ERROR_THRESHOLD: u16 = 400;

/// Result of handling one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// An indexing request was accepted
    Requested,

    /// Search Console already knows about the page
    AlreadyRequested,

    /// Nothing was submitted; `status` is the HTTP code that caused the skip
    Skipped { status: u16 },
}

/// Pages handled during a submission pass, by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub requested: Vec<String>,
    pub already_requested: Vec<String>,
    pub skipped: Vec<(String, u16)>,
}

impl SubmissionReport {
    fn record(&mut self, url: &str, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Requested => self.requested.push(url.to_string()),
            SubmissionOutcome::AlreadyRequested => self.already_requested.push(url.to_string()),
            SubmissionOutcome::Skipped { status } => self.skipped.push((url.to_string(), status)),
        }
    }

    /// Number of pages handled
    pub fn total(&self) -> usize {
        self.requested.len() + self.already_requested.len() + self.skipped.len()
    }
}

/// Submits indexing requests for pages that need them
pub struct IndexRequestSubmitter<'a> {
    metadata: &'a dyn PublishMetadataFetcher,
    indexer: &'a dyn IndexRequester,
}

impl<'a> IndexRequestSubmitter<'a> {
    pub fn new(metadata: &'a dyn PublishMetadataFetcher, indexer: &'a dyn IndexRequester) -> Self {
        Self { metadata, indexer }
    }

    /// Handles a single page
    ///
    /// # Errors
    ///
    /// * `ReindexError::RateLimited(Read)` - the metadata call answered 429
    /// * `ReindexError::RateLimited(Publish)` - the indexing request answered 429
    /// * transport errors from either call
    pub async fn submit_one(&self, token: &AccessToken, url: &str) -> Result<SubmissionOutcome> {
        let status = self.metadata.get_publish_metadata(token, url).await?;

        match status {
            HTTP_NOT_FOUND => {
                let indexing_status = self.indexer.request_indexing(token, url).await?;
                if indexing_status < HTTP_ERROR_THRESHOLD {
                    Ok(SubmissionOutcome::Requested)
                } else if indexing_status == HTTP_TOO_MANY_REQUESTS {
                    Err(ReindexError::RateLimited(RateLimitKind::Publish))
                } else {
                    tracing::warn!(
                        "Indexing request for {} answered HTTP {}",
                        url,
                        indexing_status
                    );
                    Ok(SubmissionOutcome::Skipped {
                        status: indexing_status,
                    })
                }
            }
            HTTP_TOO_MANY_REQUESTS => Err(ReindexError::RateLimited(RateLimitKind::Read)),
            status if status < HTTP_ERROR_THRESHOLD => Ok(SubmissionOutcome::AlreadyRequested),
            status => {
                tracing::warn!("Publish metadata for {} answered HTTP {}", url, status);
                Ok(SubmissionOutcome::Skipped { status })
            }
        }
    }

    /// Handles every page in order, stopping at the first fatal error
    pub async fn submit_all(
        &self,
        token: &AccessToken,
        urls: &[String],
        output: &dyn OutputHandler,
    ) -> Result<SubmissionReport> {
        let mut report = SubmissionReport::default();

        for url in urls {
            output.submission_started(url);
            let outcome = match self.submit_one(token, url).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Stopping after {} of {} pages: {}", report.total(), urls.len(), e);
                    return Err(e);
                }
            };

            tracing::debug!("{}: {:?}", url, outcome);
            output.submission_finished(url, outcome);
            report.record(url, outcome);
        }

        Ok(report)
    }
}
