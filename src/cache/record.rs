//! Cached status of a single page

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Last observed indexing status of a page
///
/// Serialized as `{"status": ..., "lastCheckedAt": ...}` with an RFC 3339
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Indexing status reported by Search Console
    pub status: String,

    /// When the status was fetched
    #[serde(rename = "lastCheckedAt")]
    pub last_checked_at: DateTime<Utc>,
}

impl StatusRecord {
    /// Creates a record checked right now
    pub fn new(status: impl Into<String>) -> Self {
        Self::checked_at(status, Utc::now())
    }

    /// Creates a record checked at the given time
    pub fn checked_at(status: impl Into<String>, last_checked_at: DateTime<Utc>) -> Self {
        Self {
            status: status.into(),
            last_checked_at,
        }
    }

    /// Returns the age of the record relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_checked_at
    }
}
