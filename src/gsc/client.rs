//! HTTP implementation of the Search Console collaborators
//!
//! All calls go through one shared `reqwest::Client`. Server errors (5xx) and
//! transport failures are retried with exponential backoff; client errors,
//! including 429, are returned to the caller untouched.

use crate::config::ApiConfig;
use crate::gsc::sitemap::{parse_sitemap, SitemapDocument};
use crate::gsc::{
    AccessToken, IndexRequester, PageStatusFetcher, PublishMetadataFetcher, SitemapPages,
    SitemapSource,
};
use crate::state::status;
use crate::{ReindexError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

/// Nested sitemap indexes are followed at most this deep
const MAX_SITEMAP_DEPTH: usize = 3;

// Backoff delays: 200ms, 400ms, 800ms, ... capped at 10s
const RETRY_BASE: u64 = 2;
const RETRY_FACTOR_MS: u64 = 100;
const RETRY_MAX_DELAY_SECS: u64 = 10;

/// Builds the HTTP client shared by every API call
///
/// # Example
///
/// ```no_run
/// use gsc_reindex::config::ApiConfig;
/// use gsc_reindex::gsc::build_http_client;
///
/// let client = build_http_client(&ApiConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ApiConfig) -> Result<Client> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectionResponse {
    inspection_result: Option<InspectionResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectionResult {
    index_status_result: Option<IndexStatusResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatusResult {
    coverage_state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SitemapList {
    #[serde(default)]
    sitemap: Vec<SitemapEntry>,
}

#[derive(Debug, Deserialize)]
struct SitemapEntry {
    path: String,
}

/// Search Console API client
#[derive(Debug, Clone)]
pub struct GscClient {
    client: Client,
    api: ApiConfig,
}

impl GscClient {
    /// Creates a client with its own HTTP connection pool
    pub fn new(api: ApiConfig) -> Result<Self> {
        let client = build_http_client(&api)?;
        Ok(Self::with_client(client, api))
    }

    /// Creates a client reusing an existing HTTP client
    pub fn with_client(client: Client, api: ApiConfig) -> Self {
        Self { client, api }
    }

    /// Sends the request built by `build`, retrying server errors
    ///
    /// Returns the response for any status below 500. After the last attempt
    /// a server error is returned as `ReindexError::Api`.
    async fn send_with_retry<F>(&self, endpoint: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let strategy = ExponentialBackoff::from_millis(RETRY_BASE)
            .factor(RETRY_FACTOR_MS)
            .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
            .take(self.api.max_retries.saturating_sub(1));

        let build = &build;
        Retry::spawn(strategy, move || async move {
            let response = build().send().await.map_err(|source| ReindexError::Http {
                url: endpoint.to_string(),
                source,
            })?;

            let status = response.status();
            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!("{} answered HTTP {}, retrying", endpoint, status);
                return Err(ReindexError::Api {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(response)
        })
        .await
    }

    /// Sends a request whose only interesting outcome is the status code
    async fn status_code_of<F>(&self, endpoint: &str, url: &str, build: F) -> Result<u16>
    where
        F: Fn() -> RequestBuilder,
    {
        match self.send_with_retry(endpoint, build).await {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::FORBIDDEN {
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        "This service account doesn't have access to {}: {}",
                        url,
                        body
                    );
                } else if status == StatusCode::TOO_MANY_REQUESTS {
                    tracing::warn!("{} answered HTTP 429 for {}", endpoint, url);
                }
                Ok(status.as_u16())
            }
            Err(ReindexError::Api { status, body, .. }) => {
                tracing::error!("{} failed for {} (HTTP {}): {}", endpoint, url, status, body);
                Ok(status)
            }
            Err(e) => Err(e),
        }
    }

    /// Lists the sitemap URLs registered for `site_url`
    async fn list_sitemaps(&self, token: &AccessToken, site_url: &str) -> Result<Vec<String>> {
        let encoded: String = url::form_urlencoded::byte_serialize(site_url.as_bytes()).collect();
        let endpoint = format!(
            "{}/webmasters/v3/sites/{}/sitemaps",
            self.api.webmasters_endpoint.trim_end_matches('/'),
            encoded
        );

        let response = self
            .send_with_retry(&endpoint, || {
                self.client.get(&endpoint).bearer_auth(token.as_str())
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReindexError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let list: SitemapList = response.json().await?;
        Ok(list.sitemap.into_iter().map(|entry| entry.path).collect())
    }

    /// Downloads and parses one sitemap document
    async fn fetch_sitemap(&self, sitemap_url: &str) -> Result<SitemapDocument> {
        let response = self
            .send_with_retry(sitemap_url, || self.client.get(sitemap_url))
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReindexError::Sitemap {
                url: sitemap_url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        parse_sitemap(sitemap_url, &body)
    }
}

#[async_trait]
impl SitemapSource for GscClient {
    async fn get_sitemap_pages(
        &self,
        token: &AccessToken,
        site_url: &str,
    ) -> Result<SitemapPages> {
        let sitemaps = self.list_sitemaps(token, site_url).await?;

        let mut queue: VecDeque<(String, usize)> =
            sitemaps.iter().map(|s| (s.clone(), 0)).collect();
        let mut visited = HashSet::new();
        let mut seen_pages = HashSet::new();
        let mut pages = Vec::new();

        while let Some((sitemap_url, depth)) = queue.pop_front() {
            if !visited.insert(sitemap_url.clone()) {
                continue;
            }

            let document = match self.fetch_sitemap(&sitemap_url).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e);
                    continue;
                }
            };

            match document {
                SitemapDocument::UrlSet(locs) => {
                    tracing::debug!("Sitemap {} lists {} pages", sitemap_url, locs.len());
                    for loc in locs {
                        if seen_pages.insert(loc.clone()) {
                            pages.push(loc);
                        }
                    }
                }
                SitemapDocument::Index(children) => {
                    if depth + 1 > MAX_SITEMAP_DEPTH {
                        tracing::warn!("Sitemap index {} nested too deep, ignoring", sitemap_url);
                        continue;
                    }
                    queue.extend(children.into_iter().map(|child| (child, depth + 1)));
                }
            }
        }

        Ok(SitemapPages { sitemaps, pages })
    }
}

#[async_trait]
impl PageStatusFetcher for GscClient {
    async fn get_page_indexing_status(
        &self,
        token: &AccessToken,
        site_url: &str,
        url: &str,
    ) -> Result<String> {
        let endpoint = format!(
            "{}/v1/urlInspection/index:inspect",
            self.api.inspection_endpoint.trim_end_matches('/')
        );
        let body = json!({ "inspectionUrl": url, "siteUrl": site_url });

        let response = match self
            .send_with_retry(&endpoint, || {
                self.client
                    .post(&endpoint)
                    .bearer_auth(token.as_str())
                    .json(&body)
            })
            .await
        {
            Ok(response) => response,
            Err(ReindexError::Api { status, body, .. }) => {
                tracing::error!(
                    "Failed to get indexing status of {} (HTTP {}): {}",
                    url,
                    status,
                    body
                );
                return Ok(status::ERROR.to_string());
            }
            Err(e) => return Err(e),
        };

        let code = response.status();
        if code == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("This service account doesn't have access to this site: {}", body);
            return Ok(status::FORBIDDEN.to_string());
        }

        if code.as_u16() >= 300 {
            if code == StatusCode::TOO_MANY_REQUESTS {
                return Ok(status::RATE_LIMITED.to_string());
            }
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to get indexing status of {} (HTTP {}): {}",
                url,
                code.as_u16(),
                body
            );
            return Ok(status::ERROR.to_string());
        }

        let inspection: InspectionResponse = response.json().await?;
        let coverage_state = inspection
            .inspection_result
            .and_then(|r| r.index_status_result)
            .and_then(|r| r.coverage_state);

        match coverage_state {
            Some(state) => Ok(state),
            None => {
                tracing::warn!("Inspection of {} returned no coverage state", url);
                Ok(status::ERROR.to_string())
            }
        }
    }
}

#[async_trait]
impl PublishMetadataFetcher for GscClient {
    async fn get_publish_metadata(&self, token: &AccessToken, url: &str) -> Result<u16> {
        let endpoint = format!(
            "{}/v3/urlNotifications/metadata",
            self.api.indexing_endpoint.trim_end_matches('/')
        );

        self.status_code_of(&endpoint, url, || {
            self.client
                .get(&endpoint)
                .bearer_auth(token.as_str())
                .query(&[("url", url)])
        })
        .await
    }
}

#[async_trait]
impl IndexRequester for GscClient {
    async fn request_indexing(&self, token: &AccessToken, url: &str) -> Result<u16> {
        let endpoint = format!(
            "{}/v3/urlNotifications:publish",
            self.api.indexing_endpoint.trim_end_matches('/')
        );
        let body = json!({ "url": url, "type": "URL_UPDATED" });

        self.status_code_of(&endpoint, url, || {
            self.client
                .post(&endpoint)
                .bearer_auth(token.as_str())
                .json(&body)
        })
        .await
    }
}
