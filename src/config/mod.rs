//! Configuration module for GSC-Reindex
//!
//! This module handles the run configuration: the optional TOML settings
//! file, its validation, and the per-run input built from the command line.
//!
//! # Example
//!
//! ```no_run
//! use gsc_reindex::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("gsc-reindex.toml")).unwrap();
//! println!("Cached statuses are trusted for {} days", settings.cache.ttl_days);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, BatchConfig, CacheConfig, RunConfig, RunInput, Settings, SettingsOverrides,
    DEFAULT_BATCH_SIZE, DEFAULT_CACHE_DIR, DEFAULT_CREDENTIALS_PATH, DEFAULT_TTL_DAYS,
};

// Re-export parser functions
pub use parser::{build_run_config, load_settings, load_settings_or_default};
