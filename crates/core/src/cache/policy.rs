//! Cache freshness rule.

use chrono::{DateTime, Days, Utc};

const DEFAULT_MAX_AGE_DAYS: u64 = 7;

/// Decides whether a cached feed is still fresh.
///
/// A feed stamped at `T` is valid while `now < T + max_age`; at exactly
/// `T + max_age` it has expired. Days are added with `chrono::Days` on UTC
/// instants, where every calendar day is 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCachePolicy {
    max_age_days: u64,
}

impl Default for FeedCachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE_DAYS)
    }
}

impl FeedCachePolicy {
    pub const fn new(max_age_days: u64) -> Self {
        Self { max_age_days }
    }

    pub fn max_age_days(&self) -> u64 {
        self.max_age_days
    }

    /// Whether a feed cached at `timestamp` is still valid at `now`.
    ///
    /// A `timestamp + max_age` beyond the representable range never expires.
    pub fn validate(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match timestamp.checked_add_days(Days::new(self.max_age_days)) {
            Some(max_age) => now < max_age,
            None => true,
        }
    }
}
