//! Decides when a cached status has to be verified again

use crate::cache::StatusRecord;
use crate::config::DEFAULT_TTL_DAYS;
use crate::state::status::RATE_LIMITED;
use crate::state::INDEXABLE_STATUSES;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Returns true if `record` must be fetched again
///
/// A record is rechecked when its status is one of `recheckable` OR when it
/// is at least `ttl` old. Either condition alone is enough.
pub fn should_recheck(
    record: &StatusRecord,
    recheckable: &HashSet<String>,
    ttl: Duration,
    now: DateTime<Utc>,
) -> bool {
    recheckable.contains(&record.status) || record.age(now) >= ttl
}

/// Recheck policy applied by the reconciler
#[derive(Debug, Clone)]
pub struct RecheckPolicy {
    recheckable: HashSet<String>,
    ttl: Duration,
}

impl RecheckPolicy {
    /// Policy rechecking indexable and rate-limited statuses, and anything
    /// older than `ttl`
    pub fn new(ttl: Duration) -> Self {
        let statuses = INDEXABLE_STATUSES.iter().copied().chain([RATE_LIMITED]);
        Self::with_statuses(statuses, ttl)
    }

    /// Policy with a caller-supplied set of always-rechecked statuses
    pub fn with_statuses<I, S>(statuses: I, ttl: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recheckable: statuses.into_iter().map(Into::into).collect(),
            ttl,
        }
    }

    /// Policy built from a TTL in days
    pub fn from_ttl_days(days: u32) -> Self {
        Self::new(Duration::days(i64::from(days)))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true if `record` must be fetched again as of `now`
    pub fn should_recheck_at(&self, record: &StatusRecord, now: DateTime<Utc>) -> bool {
        should_recheck(record, &self.recheckable, self.ttl, now)
    }
}

impl Default for RecheckPolicy {
    fn default() -> Self {
        Self::from_ttl_days(DEFAULT_TTL_DAYS)
    }
}
