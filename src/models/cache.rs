//! Cached post index entry.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::PostRecord;

/// Version of the cached post layout. Entries written under another version
/// are ignored.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// A post index snapshot together with the instant it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Published posts only, newest first, with paths already made absolute
    /// against the source they came from. Not the origin's index order.
    pub posts: Vec<PostRecord>,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(posts: Vec<PostRecord>, timestamp: DateTime<Utc>) -> Self {
        Self { posts, timestamp }
    }

    /// Time elapsed since the entry was written (zero if written "in the future").
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Fresh while `now - timestamp < max_age`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) < max_age
    }
}
