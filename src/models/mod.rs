// src/models/mod.rs

//! Domain models for postfeed.
//!
//! Content origins, post index records, cached snapshots and configuration.

mod cache;
mod config;
mod post;
mod source;

// Re-export all public types
pub use cache::{CACHE_SCHEMA_VERSION, CacheEntry};
pub use config::{CacheConfig, ClientConfig, Config, LoggingConfig, validate_sources};
pub use post::{IndexDocument, PostRecord, PostStatus, parse_index, published_newest_first};
pub use source::ContentSource;

#[cfg(test)]
pub(crate) use post::tests::make_post;
