//! Time-boxed post index cache and the preferred-source pointer.
//!
//! Storage problems never escape this module: a failing or corrupted store
//! reads as a cache miss and a failed write is logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{CACHE_SCHEMA_VERSION, CacheEntry, PostRecord};
use crate::storage::{KeyValueStore, keys};
use crate::utils::clock::Clock;

pub struct ContentCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    duration: Duration,
}

impl ContentCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, duration: Duration) -> Self {
        Self {
            store,
            clock,
            duration,
        }
    }

    /// Freshness window.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The cached entry, only while it is still fresh.
    pub async fn read(&self) -> Option<CacheEntry> {
        let entry = self.read_stale().await?;
        let now = self.now();
        if entry.is_fresh(now, self.duration) {
            Some(entry)
        } else {
            log::debug!(
                "Cached index is stale ({}s old)",
                entry.age(now).as_secs()
            );
            None
        }
    }

    /// The cached entry regardless of age. Meant for total network failure.
    pub async fn read_stale(&self) -> Option<CacheEntry> {
        match self.load_entry().await {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Ignoring unreadable post cache: {}", e);
                None
            }
        }
    }

    /// Replace the cached entry, stamped with the current time.
    pub async fn write(&self, posts: &[PostRecord]) {
        if let Err(e) = self.store_entry(posts).await {
            log::warn!("Failed to write post cache: {}", e);
        }
    }

    /// Name of the last selected source, if one is remembered.
    pub async fn preferred_source(&self) -> Option<String> {
        match self.store.get(keys::PREFERRED_SOURCE).await {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                log::warn!("Ignoring unreadable preferred source: {}", e);
                None
            }
        }
    }

    pub async fn set_preferred_source(&self, name: &str) {
        if let Err(e) = self.store.set(keys::PREFERRED_SOURCE, name).await {
            log::warn!("Failed to remember preferred source '{}': {}", name, e);
        }
    }

    /// Forget the preferred source so the next selection probes everything.
    pub async fn invalidate_preference(&self) {
        if let Err(e) = self.store.remove(keys::PREFERRED_SOURCE).await {
            log::warn!("Failed to clear preferred source: {}", e);
        }
    }

    async fn load_entry(&self) -> Result<Option<CacheEntry>> {
        let Some(version) = self.store.get(keys::VERSION).await? else {
            return Ok(None);
        };
        if version.trim().parse::<u32>().ok() != Some(CACHE_SCHEMA_VERSION) {
            log::info!(
                "Discarding post cache written with layout version '{}'",
                version.trim()
            );
            return Ok(None);
        }

        let Some(raw_timestamp) = self.store.get(keys::TIMESTAMP).await? else {
            return Ok(None);
        };
        let Some(raw_posts) = self.store.get(keys::POSTS).await? else {
            return Ok(None);
        };

        let millis: i64 = raw_timestamp
            .trim()
            .parse()
            .map_err(|e| AppError::storage(keys::TIMESTAMP, e))?;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| AppError::storage(keys::TIMESTAMP, "timestamp out of range"))?;
        let posts: Vec<PostRecord> = serde_json::from_str(&raw_posts)?;

        Ok(Some(CacheEntry::new(posts, timestamp)))
    }

    async fn store_entry(&self, posts: &[PostRecord]) -> Result<()> {
        let body = serde_json::to_string(posts)?;
        let millis = self.now().timestamp_millis();

        // No timestamp while the entry is being replaced; it goes back last.
        self.store.remove(keys::TIMESTAMP).await?;
        self.store.set(keys::POSTS, &body).await?;
        self.store
            .set(keys::VERSION, &CACHE_SCHEMA_VERSION.to_string())
            .await?;
        self.store.set(keys::TIMESTAMP, &millis.to_string()).await?;

        log::debug!("Cached {} posts", posts.len());
        Ok(())
    }
}
