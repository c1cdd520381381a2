//! Console rendering of run progress

use crate::engine::{RunReport, SubmissionOutcome};
use crate::output::OutputHandler;
use crate::state::{emoji_for_status, StatusBuckets};

/// Prints run progress to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl OutputHandler for ConsoleOutput {
    fn site_started(&self, site_url: &str) {
        println!("🔎 Processing site: {}", site_url);
    }

    fn pages_found(&self, sitemap_count: usize, page_count: usize) {
        println!(
            "👉 Found {} URLs in {} sitemap{}",
            page_count,
            sitemap_count,
            if sitemap_count == 1 { "" } else { "s" }
        );
    }

    fn batch_complete(&self, batch_index: usize, batch_count: usize) {
        println!("📦 Batch {} of {} complete", batch_index + 1, batch_count);
    }

    fn statuses_resolved(&self, buckets: &StatusBuckets) {
        println!();
        println!(
            "👍 Done, here's the status of all {} pages:",
            buckets.page_count()
        );
        for line in status_summary_lines(buckets) {
            println!("{}", line);
        }
        println!();
    }

    fn indexable_found(&self, urls: &[String]) {
        if urls.is_empty() {
            println!("✨ There are no pages that can be indexed. Everything is already indexed!");
        } else {
            println!("✨ Found {} pages that can be indexed.", urls.len());
            for url in urls {
                println!("• {}", url);
            }
        }
        println!();
    }

    fn submission_started(&self, url: &str) {
        println!("📄 Processing url: {}", url);
    }

    fn submission_finished(&self, _url: &str, outcome: SubmissionOutcome) {
        println!("{}", outcome_message(outcome));
        println!();
    }

    fn run_finished(&self, report: &RunReport) {
        println!(
            "👍 All done! {} requested, {} already requested, {} skipped.",
            report.submission.requested.len(),
            report.submission.already_requested.len(),
            report.submission.skipped.len()
        );
        println!();
    }
}

/// One `• <emoji> <status>: <n> pages` line per bucket, in bucket order
pub fn status_summary_lines(buckets: &StatusBuckets) -> Vec<String> {
    buckets
        .iter()
        .map(|(status, pages)| {
            format!(
                "• {} {}: {} pages",
                emoji_for_status(status),
                status,
                pages.len()
            )
        })
        .collect()
}

/// Operator-facing message for a submission outcome
pub fn outcome_message(outcome: SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Requested => {
            "🚀 Indexing requested successfully. It may take a few days for Google to process it."
                .to_string()
        }
        SubmissionOutcome::AlreadyRequested => {
            "🕛 Indexing already requested previously. It may take a few days for Google to process it."
                .to_string()
        }
        SubmissionOutcome::Skipped { status } => {
            format!("⏭️ Skipped, the API answered HTTP {}.", status)
        }
    }
}
