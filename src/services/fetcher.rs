// src/services/fetcher.rs

//! Index and post body retrieval.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::ContentSource;
use crate::utils::http::fetch_bytes;

/// Retrieves raw content from origins.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the raw post index body from a source.
    async fn fetch_index(&self, source: &ContentSource) -> Result<Vec<u8>>;

    /// Fetch a text document (a post body) by absolute URL.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Fetches over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: String,
    index_path: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(
        client: Client,
        origin: impl Into<String>,
        index_path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            origin: origin.into(),
            index_path: index_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch_index(&self, source: &ContentSource) -> Result<Vec<u8>> {
        let url = source.resource_url(&self.origin, &self.index_path);
        log::info!("Fetching post index from {} ({})", source.name, url);
        fetch_bytes(&self.client, &url, self.timeout).await
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = fetch_bytes(&self.client, url, self.timeout).await?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::validation(format!("{url} is not valid UTF-8: {e}")))
    }
}
