//! GSC-Reindex: indexing-status reconciliation for Google Search Console
//!
//! This crate checks a site's pages against their Search Console indexing
//! status, caches what it observed, and requests (re-)indexing for the pages
//! that are not indexed while respecting the API rate limits.

pub mod cache;
pub mod config;
pub mod engine;
pub mod gsc;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GSC-Reindex operations
#[derive(Debug, Error)]
pub enum ReindexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Status cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    RateLimited(RateLimitKind),

    #[error("No sitemaps found for {site_url}, add them to Google Search Console and try again")]
    NoSitemaps { site_url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unexpected API response from {endpoint} (HTTP {status}): {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Sitemap error for {url}: {message}")]
    Sitemap { url: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Please provide a domain, a site URL or a CSV as the first argument")]
    MissingInput,

    #[error("{} not found, please provide a service account JSON key", .0.display())]
    MissingCredentials(PathBuf),

    #[error("Invalid credentials file {}: {message}", .path.display())]
    InvalidCredentials { path: PathBuf, message: String },
}

/// Status cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access cache file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which Search Console rate limit was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitKind {
    /// Metadata reads, 60 requests per second
    Read,
    /// Indexing publish requests, 200 requests per day
    Publish,
}

impl fmt::Display for RateLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "Read rate limit reached (60/second). Try again later."),
            Self::Publish => write!(f, "Publish rate limit reached (200/day). Try again later."),
        }
    }
}

/// Result type alias for GSC-Reindex operations
pub type Result<T> = std::result::Result<T, ReindexError>;

/// Result type alias for status cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// Re-export commonly used types
pub use cache::{RecheckPolicy, StatusCache, StatusRecord};
pub use config::{RunConfig, RunInput, Settings};
pub use engine::{BatchRunner, IndexRequestSubmitter, RunReport, Services, StatusReconciler};
pub use url::{cache_file_name, convert_to_site_url};
