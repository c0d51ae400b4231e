// src/services/selector.rs

//! Source selection: remembered preference first, then a concurrent probe of
//! the whole registry ranked by priority.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::error::{AppError, Result};
use crate::models::ContentSource;
use crate::services::{Prober, SourceRegistry};
use crate::storage::ContentCache;

/// Latency class of a reachable origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionQuality {
    /// Under one second
    Excellent,
    /// Under three seconds
    Good,
    Slow,
}

impl ConnectionQuality {
    pub fn from_latency(latency: Duration) -> Self {
        if latency < Duration::from_secs(1) {
            Self::Excellent
        } else if latency < Duration::from_secs(3) {
            Self::Good
        } else {
            Self::Slow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Slow => "slow",
        }
    }
}

/// Outcome of probing one source during a survey.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub source: ContentSource,
    pub reachable: bool,
    pub latency: Duration,
}

impl ProbeReport {
    /// Latency class, `None` when the source was unreachable.
    pub fn quality(&self) -> Option<ConnectionQuality> {
        self.reachable
            .then(|| ConnectionQuality::from_latency(self.latency))
    }
}

/// Pick the reachable source with the smallest priority.
///
/// Ties go to the candidate listed first.
pub fn pick_best<'a>(
    candidates: impl IntoIterator<Item = (&'a ContentSource, bool)>,
) -> Option<&'a ContentSource> {
    candidates
        .into_iter()
        .filter(|(_, reachable)| *reachable)
        .map(|(source, _)| source)
        .min_by_key(|source| source.priority)
}

/// Chooses the origin to load content from.
#[derive(Clone)]
pub struct SourceSelector {
    registry: Arc<SourceRegistry>,
    prober: Arc<dyn Prober>,
    cache: Arc<ContentCache>,
}

impl SourceSelector {
    pub fn new(
        registry: Arc<SourceRegistry>,
        prober: Arc<dyn Prober>,
        cache: Arc<ContentCache>,
    ) -> Self {
        Self {
            registry,
            prober,
            cache,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Select the best reachable source and remember it.
    ///
    /// A remembered source that still answers is returned without probing
    /// anything else. Otherwise every source is probed concurrently.
    pub async fn select_best_source(&self) -> Result<ContentSource> {
        if let Some(source) = self.try_preferred().await {
            return Ok(source);
        }

        let results = self.probe_all().await;
        let reachable = results.iter().filter(|(_, ok)| *ok).count();
        log::info!(
            "Probed {} sources, {} reachable",
            self.registry.len(),
            reachable
        );

        match pick_best(results) {
            Some(source) => {
                log::info!(
                    "Selected source {} (priority {})",
                    source.name,
                    source.priority
                );
                self.cache.set_preferred_source(&source.name).await;
                Ok(source.clone())
            }
            None => Err(AppError::NoReachableSource {
                attempted: self.registry.names(),
            }),
        }
    }

    /// Probe every source concurrently, recording latency. Leaves the
    /// remembered preference untouched.
    pub async fn survey(&self) -> Vec<ProbeReport> {
        let probes = self.registry.iter().map(|source| async move {
            let started = Instant::now();
            let reachable = self.prober.probe(source).await;
            ProbeReport {
                source: source.clone(),
                reachable,
                latency: started.elapsed(),
            }
        });
        join_all(probes).await
    }

    async fn try_preferred(&self) -> Option<ContentSource> {
        let name = self.cache.preferred_source().await?;
        let Some(source) = self.registry.find(&name) else {
            log::debug!("Preferred source '{}' is no longer registered", name);
            return None;
        };

        if self.prober.probe(source).await {
            log::info!("Using preferred source {}", source.name);
            Some(source.clone())
        } else {
            log::info!(
                "Preferred source {} is unreachable, probing all sources",
                source.name
            );
            None
        }
    }

    async fn probe_all(&self) -> Vec<(&ContentSource, bool)> {
        let probes = self
            .registry
            .iter()
            .map(|source| async move { (source, self.prober.probe(source).await) });
        join_all(probes).await
    }
}
