//! Full runs with in-memory Search Console collaborators

use async_trait::async_trait;
use gsc_reindex::config::{RunConfig, RunInput, Settings};
use gsc_reindex::engine::{run, Services, SubmissionOutcome};
use gsc_reindex::gsc::{
    AccessToken, IndexRequester, PageStatusFetcher, PublishMetadataFetcher, SitemapPages,
    SitemapSource, TokenProvider,
};
use gsc_reindex::output::{NullOutput, OutputHandler};
use gsc_reindex::state::StatusBuckets;
use gsc_reindex::{RateLimitKind, ReindexError, Result, StatusCache};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

const INDEXED: &str = "Submitted and indexed";
const CRAWLED: &str = "Crawled - currently not indexed";
const UNKNOWN: &str = "URL is unknown to Google";

/// Search Console stand-in answering from fixed tables
#[derive(Default)]
struct FakeSearchConsole {
    sitemaps: Vec<String>,
    pages: Vec<String>,
    statuses: HashMap<String, String>,
    metadata: HashMap<String, u16>,
    status_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
    publish_calls: AtomicUsize,
}

impl FakeSearchConsole {
    fn site(pages: &[(&str, &str)]) -> Self {
        Self {
            sitemaps: vec!["https://example.com/sitemap.xml".to_string()],
            pages: pages.iter().map(|(url, _)| url.to_string()).collect(),
            statuses: pages
                .iter()
                .map(|(url, status)| (url.to_string(), status.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn with_metadata(mut self, url: &str, status: u16) -> Self {
        self.metadata.insert(url.to_string(), status);
        self
    }

    fn services(&self) -> Services<'_> {
        Services {
            tokens: self,
            sitemaps: self,
            statuses: self,
            metadata: self,
            indexer: self,
        }
    }
}

#[async_trait]
impl TokenProvider for FakeSearchConsole {
    async fn get_access_token(&self) -> Result<AccessToken> {
        Ok(AccessToken::new("test-token"))
    }
}

#[async_trait]
impl SitemapSource for FakeSearchConsole {
    async fn get_sitemap_pages(
        &self,
        _token: &AccessToken,
        _site_url: &str,
    ) -> Result<SitemapPages> {
        Ok(SitemapPages {
            sitemaps: self.sitemaps.clone(),
            pages: self.pages.clone(),
        })
    }
}

#[async_trait]
impl PageStatusFetcher for FakeSearchConsole {
    async fn get_page_indexing_status(
        &self,
        _token: &AccessToken,
        _site_url: &str,
        url: &str,
    ) -> Result<String> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .statuses
            .get(url)
            .cloned()
            .unwrap_or_else(|| "Error".to_string()))
    }
}

#[async_trait]
impl PublishMetadataFetcher for FakeSearchConsole {
    async fn get_publish_metadata(&self, _token: &AccessToken, url: &str) -> Result<u16> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.metadata.get(url).copied().unwrap_or(404))
    }
}

#[async_trait]
impl IndexRequester for FakeSearchConsole {
    async fn request_indexing(&self, _token: &AccessToken, _url: &str) -> Result<u16> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        Ok(200)
    }
}

/// Records the events a run reports
#[derive(Default)]
struct RecordingOutput {
    events: Mutex<Vec<String>>,
}

impl RecordingOutput {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl OutputHandler for RecordingOutput {
    fn site_started(&self, site_url: &str) {
        self.push(format!("site {}", site_url));
    }

    fn pages_found(&self, sitemap_count: usize, page_count: usize) {
        self.push(format!("found {} in {}", page_count, sitemap_count));
    }

    fn batch_complete(&self, batch_index: usize, batch_count: usize) {
        self.push(format!("batch {}/{}", batch_index + 1, batch_count));
    }

    fn statuses_resolved(&self, buckets: &StatusBuckets) {
        self.push(format!("resolved {}", buckets.page_count()));
    }

    fn indexable_found(&self, urls: &[String]) {
        self.push(format!("indexable {}", urls.len()));
    }

    fn submission_finished(&self, url: &str, outcome: SubmissionOutcome) {
        self.push(format!("{} {:?}", url, outcome));
    }
}

fn create_test_config(input: RunInput, cache_dir: &Path) -> RunConfig {
    let mut settings = Settings::default();
    settings.cache.dir = cache_dir.to_string_lossy().into_owned();
    settings.batch.size = 2;

    RunConfig {
        input,
        credentials: PathBuf::from("service_account.json"),
        settings,
    }
}

fn site_pages() -> Vec<(&'static str, &'static str)> {
    vec![
        ("https://example.com/", INDEXED),
        ("https://example.com/a", CRAWLED),
        ("https://example.com/b", UNKNOWN),
    ]
}

#[tokio::test]
async fn test_site_run_submits_indexable_pages() {
    let dir = TempDir::new().unwrap();
    let gsc = FakeSearchConsole::site(&site_pages()).with_metadata("https://example.com/b", 200);
    let config = create_test_config(RunInput::Site("example.com".to_string()), dir.path());
    let output = RecordingOutput::default();

    let report = run(&config, &gsc.services(), &output).await.unwrap();

    assert_eq!(report.site_url.as_deref(), Some("sc-domain:example.com"));
    assert_eq!(report.sitemaps.len(), 1);
    assert_eq!(report.buckets.len(), 3);
    assert_eq!(
        report.indexable,
        vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string()
        ]
    );
    assert_eq!(report.submission.requested, vec!["https://example.com/a".to_string()]);
    assert_eq!(
        report.submission.already_requested,
        vec!["https://example.com/b".to_string()]
    );
    assert_eq!(gsc.publish_calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        output.events(),
        vec![
            "site sc-domain:example.com",
            "found 3 in 1",
            "batch 1/2",
            "batch 2/2",
            "resolved 3",
            "indexable 2",
            "https://example.com/a Requested",
            "https://example.com/b AlreadyRequested",
        ]
    );

    let cache = StatusCache::load(&dir.path().join("sc-domain_example.com.json")).unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("https://example.com/").unwrap().status, INDEXED);
}

#[tokio::test]
async fn test_second_run_within_ttl_reuses_indexed_statuses() {
    let dir = TempDir::new().unwrap();
    let gsc = FakeSearchConsole::site(&site_pages());
    let config = create_test_config(RunInput::Site("https://example.com".to_string()), dir.path());

    let first = run(&config, &gsc.services(), &NullOutput).await.unwrap();
    assert_eq!(first.site_url.as_deref(), Some("https://example.com/"));
    assert_eq!(gsc.status_calls.load(Ordering::SeqCst), 3);
    assert!(dir.path().join("https_example.com_.json").exists());

    let second = run(&config, &gsc.services(), &NullOutput).await.unwrap();

    // The indexed page is trusted, the two indexable pages are checked again
    assert_eq!(gsc.status_calls.load(Ordering::SeqCst), 5);
    assert_eq!(second.buckets, first.buckets);
}

#[tokio::test]
async fn test_csv_run_bypasses_cache() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    let csv_path = dir.path().join("urls.csv");
    std::fs::write(&csv_path, "https://a.com\nhttps://b.com\n").unwrap();

    let gsc = FakeSearchConsole::default();
    let config = create_test_config(RunInput::Csv(csv_path), &cache_dir);

    let report = run(&config, &gsc.services(), &NullOutput).await.unwrap();

    assert_eq!(report.site_url, None);
    assert_eq!(
        report.indexable,
        vec!["https://a.com".to_string(), "https://b.com".to_string()]
    );
    assert_eq!(report.submission.requested.len(), 2);
    assert_eq!(gsc.status_calls.load(Ordering::SeqCst), 0);
    assert!(!cache_dir.exists());
}

#[tokio::test]
async fn test_read_rate_limit_stops_run() {
    let dir = TempDir::new().unwrap();
    let gsc = FakeSearchConsole::site(&site_pages()).with_metadata("https://example.com/a", 429);
    let config = create_test_config(RunInput::Site("example.com".to_string()), dir.path());

    let result = run(&config, &gsc.services(), &NullOutput).await;

    assert!(matches!(
        result,
        Err(ReindexError::RateLimited(RateLimitKind::Read))
    ));
    assert_eq!(gsc.metadata_calls.load(Ordering::SeqCst), 1);
    assert_eq!(gsc.publish_calls.load(Ordering::SeqCst), 0);

    // Statuses were reconciled before submission started
    assert!(dir.path().join("sc-domain_example.com.json").exists());
}

#[tokio::test]
async fn test_site_without_sitemaps_fails_before_lookups() {
    let dir = TempDir::new().unwrap();
    let gsc = FakeSearchConsole::default();
    let config = create_test_config(RunInput::Site("example.com".to_string()), dir.path());

    let result = run(&config, &gsc.services(), &NullOutput).await;

    assert!(matches!(result, Err(ReindexError::NoSitemaps { .. })));
    assert_eq!(gsc.status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_everything_indexed_submits_nothing() {
    let dir = TempDir::new().unwrap();
    let gsc = FakeSearchConsole::site(&[
        ("https://example.com/", INDEXED),
        ("https://example.com/a", INDEXED),
    ]);
    let config = create_test_config(RunInput::Site("example.com".to_string()), dir.path());

    let report = run(&config, &gsc.services(), &NullOutput).await.unwrap();

    assert!(report.indexable.is_empty());
    assert_eq!(report.submission.total(), 0);
    assert_eq!(gsc.metadata_calls.load(Ordering::SeqCst), 0);
}
