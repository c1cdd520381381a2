use serde::Deserialize;
use std::path::PathBuf;

/// Directory holding one status cache file per site
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Days a cached status is trusted before it is verified again
pub const DEFAULT_TTL_DAYS: u32 = 14;

/// Number of concurrent status lookups per batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Service account key looked up when `--credentials` is not given
pub const DEFAULT_CREDENTIALS_PATH: &str = "service_account.json";

/// Tunable settings, optionally loaded from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Status cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory where per-site cache files are written
    pub dir: String,

    /// Maximum age of a cached status, in days
    #[serde(rename = "ttl-days")]
    pub ttl_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_CACHE_DIR.to_string(),
            ttl_days: DEFAULT_TTL_DAYS,
        }
    }
}

/// Status lookup batching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of status lookups in flight at once
    pub size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Google API endpoints and HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the URL Inspection API
    #[serde(rename = "inspection-endpoint")]
    pub inspection_endpoint: String,

    /// Base URL of the Indexing API
    #[serde(rename = "indexing-endpoint")]
    pub indexing_endpoint: String,

    /// Base URL of the Webmasters (sitemaps) API
    #[serde(rename = "webmasters-endpoint")]
    pub webmasters_endpoint: String,

    /// OAuth token endpoint used when the key file does not name one
    #[serde(rename = "token-endpoint")]
    pub token_endpoint: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Attempts made for requests failing with a server error
    #[serde(rename = "max-retries")]
    pub max_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            inspection_endpoint: "https://searchconsole.googleapis.com".to_string(),
            indexing_endpoint: "https://indexing.googleapis.com".to_string(),
            webmasters_endpoint: "https://www.googleapis.com".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            timeout_secs: 30,
            max_retries: 5,
        }
    }
}

/// Settings given on the command line, taking precedence over the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub cache_dir: Option<String>,
    pub batch_size: Option<usize>,
    pub ttl_days: Option<u32>,
}

impl SettingsOverrides {
    /// Replaces every field of `settings` that has an override
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dir) = &self.cache_dir {
            settings.cache.dir = dir.clone();
        }
        if let Some(size) = self.batch_size {
            settings.batch.size = size;
        }
        if let Some(days) = self.ttl_days {
            settings.cache.ttl_days = days;
        }
    }
}

/// Where the candidate URLs of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunInput {
    /// A domain or site URL whose sitemaps are enumerated
    Site(String),

    /// A CSV file whose first column lists URLs
    Csv(PathBuf),
}

impl RunInput {
    /// Interprets the positional argument: paths ending in `.csv` are CSV
    /// input, anything else names a site.
    pub fn from_arg(arg: &str) -> Self {
        if arg.ends_with(".csv") {
            Self::Csv(PathBuf::from(arg))
        } else {
            Self::Site(arg.to_string())
        }
    }
}

/// Everything a single run needs, built once at startup
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: RunInput,
    pub credentials: PathBuf,
    pub settings: Settings,
}
