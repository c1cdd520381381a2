//! Google Search Console collaborators
//!
//! The engine only talks to Google through the traits defined here:
//! - `TokenProvider`: OAuth access token for the run
//! - `SitemapSource`: sitemaps registered for a site and the pages they list
//! - `PageStatusFetcher`: URL Inspection coverage state of a page
//! - `PublishMetadataFetcher`: Indexing API notification metadata
//! - `IndexRequester`: Indexing API `URL_UPDATED` publish
//!
//! `GscClient` and `ServiceAccountTokenProvider` implement them over HTTP.

mod auth;
mod client;
mod sitemap;

pub use auth::{ServiceAccountKey, ServiceAccountTokenProvider, SCOPES};
pub use client::{build_http_client, GscClient};
pub use sitemap::{parse_sitemap, SitemapDocument};

use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// OAuth bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Sitemaps registered for a site and the unique pages they list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapPages {
    pub sitemaps: Vec<String>,
    pub pages: Vec<String>,
}

/// Supplies the access token used for every API call of a run
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_access_token(&self) -> Result<AccessToken>;
}

/// Enumerates the pages of a site from its registered sitemaps
#[async_trait]
pub trait SitemapSource: Send + Sync {
    async fn get_sitemap_pages(&self, token: &AccessToken, site_url: &str)
        -> Result<SitemapPages>;
}

/// Looks up the current indexing status of a page
#[async_trait]
pub trait PageStatusFetcher: Send + Sync {
    async fn get_page_indexing_status(
        &self,
        token: &AccessToken,
        site_url: &str,
        url: &str,
    ) -> Result<String>;
}

/// Reads Indexing API metadata for a page, returning the HTTP status code
#[async_trait]
pub trait PublishMetadataFetcher: Send + Sync {
    async fn get_publish_metadata(&self, token: &AccessToken, url: &str) -> Result<u16>;
}

/// Submits an indexing request for a page, returning the HTTP status code
#[async_trait]
pub trait IndexRequester: Send + Sync {
    async fn request_indexing(&self, token: &AccessToken, url: &str) -> Result<u16>;
}
