//! Storage abstractions for persisted client state.
//!
//! The loader keeps four string entries in a key/value store, mirroring the
//! browser's local storage layout:
//!
//! ```text
//! {store_dir}/
//! ├── blog_posts_cache          # JSON array of post records
//! ├── blog_posts_cache_time     # write instant, epoch milliseconds
//! ├── blog_posts_cache_version  # cache layout version
//! └── preferred_data_source     # name of the last selected source
//! ```

pub mod cache;
pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use cache::ContentCache;
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Persisted entry names.
pub mod keys {
    pub const POSTS: &str = "blog_posts_cache";
    pub const TIMESTAMP: &str = "blog_posts_cache_time";
    pub const VERSION: &str = "blog_posts_cache_version";
    pub const PREFERRED_SOURCE: &str = "preferred_data_source";
}

/// Trait for string key/value backends.
///
/// Each key is read and written independently; a `set` replaces the whole
/// value or leaves the previous one in place.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
