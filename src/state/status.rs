//! Indexing status vocabulary
//!
//! Statuses are the `coverageState` strings returned by the URL Inspection
//! API plus three synthetic statuses produced when an inspection call fails.
//! Unknown strings are passed through unchanged.

pub const SUBMITTED_AND_INDEXED: &str = "Submitted and indexed";
pub const DUPLICATE_WITHOUT_CANONICAL: &str = "Duplicate without user-selected canonical";
pub const CRAWLED_NOT_INDEXED: &str = "Crawled - currently not indexed";
pub const DISCOVERED_NOT_INDEXED: &str = "Discovered - currently not indexed";
pub const PAGE_WITH_REDIRECT: &str = "Page with redirect";
pub const UNKNOWN_TO_GOOGLE: &str = "URL is unknown to Google";
pub const EXCLUDED_BY_NOINDEX: &str = "Excluded by 'noindex' tag";

/// Spelling of the noindex status used by the live API (typographic quotes)
pub const EXCLUDED_BY_NOINDEX_TYPOGRAPHIC: &str = "Excluded by \u{2018}noindex\u{2019} tag";

// Synthetic statuses
pub const RATE_LIMITED: &str = "RateLimited";
pub const FORBIDDEN: &str = "Forbidden";
pub const ERROR: &str = "Error";

/// Statuses for which an indexing request is worth submitting
///
/// These are also the statuses whose cached value is always re-verified.
pub const INDEXABLE_STATUSES: [&str; 7] = [
    DISCOVERED_NOT_INDEXED,
    CRAWLED_NOT_INDEXED,
    UNKNOWN_TO_GOOGLE,
    FORBIDDEN,
    ERROR,
    EXCLUDED_BY_NOINDEX,
    EXCLUDED_BY_NOINDEX_TYPOGRAPHIC,
];

/// Returns true if a page with this status should be submitted for indexing
pub fn is_indexable(status: &str) -> bool {
    INDEXABLE_STATUSES.contains(&status)
}

/// Returns the console emoji for a status
pub fn emoji_for_status(status: &str) -> &'static str {
    match status {
        SUBMITTED_AND_INDEXED => "✅",
        DUPLICATE_WITHOUT_CANONICAL => "😵",
        CRAWLED_NOT_INDEXED | DISCOVERED_NOT_INDEXED => "👀",
        PAGE_WITH_REDIRECT => "🔀",
        UNKNOWN_TO_GOOGLE => "❓",
        RATE_LIMITED => "🚦",
        _ => "❌",
    }
}
