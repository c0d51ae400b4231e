// src/pipeline/info.rs

//! Cache and preference status.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::CacheEntry;
use crate::services::ContentService;

/// Print cache age, freshness and the remembered source.
pub async fn run_info(service: &ContentService, store_dir: &Path) -> Result<()> {
    let cache = service.cache();
    let entry = cache.read_stale().await;
    let preferred = cache.preferred_source().await;

    print!(
        "{}",
        render_info(
            entry.as_ref(),
            cache.now(),
            cache.duration(),
            preferred.as_deref(),
            store_dir,
        )
    );
    Ok(())
}

pub fn render_info(
    entry: Option<&CacheEntry>,
    now: DateTime<Utc>,
    window: Duration,
    preferred: Option<&str>,
    store_dir: &Path,
) -> String {
    let mut out = format!("Store:     {}\n", store_dir.display());
    match entry {
        Some(entry) => {
            let state = if entry.is_fresh(now, window) {
                "fresh"
            } else {
                "stale"
            };
            out.push_str(&format!(
                "Cache:     {} posts, written {} ({}s ago, {})\n",
                entry.posts.len(),
                entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.age(now).as_secs(),
                state
            ));
        }
        None => out.push_str("Cache:     empty\n"),
    }
    out.push_str(&format!("Window:    {}s\n", window.as_secs()));
    out.push_str(&format!("Preferred: {}\n", preferred.unwrap_or("none")));
    out
}
