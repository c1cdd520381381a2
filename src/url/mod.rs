//! URL handling module for GSC-Reindex
//!
//! This module converts user input into Search Console property identifiers
//! and derives the per-site cache file location.

mod site;

use std::path::{Path, PathBuf};

// Re-export main functions
pub use site::{cache_file_name, convert_to_site_url, DOMAIN_PROPERTY_PREFIX};

/// Returns the full path of the status cache file for a site
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use gsc_reindex::url::cache_path;
///
/// assert_eq!(
///     cache_path(Path::new(".cache"), "https://example.com/"),
///     PathBuf::from(".cache/https_example.com_.json")
/// );
/// ```
pub fn cache_path(cache_dir: &Path, site_url: &str) -> PathBuf {
    cache_dir.join(cache_file_name(site_url))
}
