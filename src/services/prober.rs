// src/services/prober.rs

//! Reachability probes against content origins.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::ContentSource;
use crate::utils::http::head_status;

/// Lightweight reachability check for one origin.
///
/// A probe never fails: every error, timeout or non-success status is
/// reported as unreachable.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, source: &ContentSource) -> bool;
}

/// Probes an origin with a `HEAD` request for its index resource.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    origin: String,
    index_path: String,
    timeout: Duration,
}

impl HttpProber {
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
impl Prober for HttpProber {
    async fn probe(&self, source: &ContentSource) -> bool {
        let url = source.resource_url(&self.origin, &self.index_path);
        match head_status(&self.client, &url, self.timeout).await {
            Ok(status) if (200..300).contains(&status) => {
                log::debug!("Probe {} ({}): HTTP {}", source.name, url, status);
                true
            }
            Ok(status) => {
                log::debug!("Probe {} ({}): HTTP {}", source.name, url, status);
                false
            }
            Err(e) => {
                log::debug!("Probe {} ({}) failed: {}", source.name, url, e);
                false
            }
        }
    }
}
