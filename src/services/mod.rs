//! Service layer for postfeed.
//!
//! This module contains the business logic for:
//! - The origin registry (`SourceRegistry`)
//! - Reachability probing (`Prober`, `HttpProber`)
//! - Source selection (`SourceSelector`)
//! - Index and body fetching (`ContentFetcher`, `HttpFetcher`)
//! - The loader façade (`ContentService`)
//! - Search and pagination helpers (`query`)

mod fetcher;
mod loader;
mod prober;
pub mod query;
mod registry;
mod selector;

#[cfg(test)]
mod test_server;

pub use fetcher::{ContentFetcher, HttpFetcher};
pub use loader::{ContentService, LoadOutcome};
pub use prober::{HttpProber, Prober};
pub use registry::SourceRegistry;
pub use selector::{ConnectionQuality, ProbeReport, SourceSelector, pick_best};
