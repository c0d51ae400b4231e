// src/services/loader.rs

//! Content loader façade.
//!
//! `ContentService::load_posts` never fails. It resolves to fresh posts,
//! stale cached posts flagged as degraded, or an offline signal naming the
//! sources that were tried.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::{Config, PostRecord, parse_index, published_newest_first};
use crate::services::{ContentFetcher, HttpFetcher, HttpProber, SourceRegistry, SourceSelector};
use crate::storage::{ContentCache, LocalStore};
use crate::utils::clock::SystemClock;
use crate::utils::http::create_async_client;
use crate::utils::url::absolutize;

/// What the presentation layer gets from a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Freshly fetched or fresh-cached posts
    Fresh(Vec<PostRecord>),
    /// Expired cached posts served because every origin failed
    Degraded(Vec<PostRecord>),
    /// Nothing to show; `attempted` lists the sources that were tried
    Offline { attempted: Vec<String> },
}

impl LoadOutcome {
    /// Posts to render; empty when offline.
    pub fn posts(&self) -> &[PostRecord] {
        match self {
            Self::Fresh(posts) | Self::Degraded(posts) => posts,
            Self::Offline { .. } => &[],
        }
    }

    pub fn into_posts(self) -> Vec<PostRecord> {
        match self {
            Self::Fresh(posts) | Self::Degraded(posts) => posts,
            Self::Offline { .. } => Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline { .. })
    }
}

struct Inner {
    selector: SourceSelector,
    fetcher: Arc<dyn ContentFetcher>,
    cache: Arc<ContentCache>,
    origin: String,
    refresh_after: Duration,
    refresh: Mutex<Option<JoinHandle<()>>>,
}

/// Blog content service: cache, source selection and index fetching behind
/// a single entry point. Cloning is cheap and shares state.
#[derive(Clone)]
pub struct ContentService {
    inner: Arc<Inner>,
}

impl ContentService {
    /// Assemble a service from its parts.
    ///
    /// A cache hit older than `refresh_after` also refreshes the cache in the
    /// background.
    pub fn new(
        selector: SourceSelector,
        fetcher: Arc<dyn ContentFetcher>,
        cache: Arc<ContentCache>,
        origin: impl Into<String>,
        refresh_after: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                selector,
                fetcher,
                cache,
                origin: origin.into(),
                refresh_after,
                refresh: Mutex::new(None),
            }),
        }
    }

    /// Build the HTTP-backed service described by a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = Arc::new(SourceRegistry::new(config.sources.clone())?);
        let client = create_async_client(&config.client)?;

        let cache = Arc::new(ContentCache::new(
            Arc::new(LocalStore::new(&config.cache.store_dir)),
            Arc::new(SystemClock),
            config.cache_duration(),
        ));
        let prober = Arc::new(HttpProber::new(
            client.clone(),
            &config.client.origin,
            &config.client.index_path,
            config.probe_timeout(),
        ));
        let fetcher = Arc::new(HttpFetcher::new(
            client,
            &config.client.origin,
            &config.client.index_path,
            config.fetch_timeout(),
        ));

        let selector = SourceSelector::new(registry, prober, cache.clone());
        Ok(Self::new(
            selector,
            fetcher,
            cache,
            &config.client.origin,
            config.refresh_after(),
        ))
    }

    pub fn selector(&self) -> &SourceSelector {
        &self.inner.selector
    }

    pub fn cache(&self) -> &ContentCache {
        &self.inner.cache
    }

    /// Load published posts, newest first.
    pub async fn load_posts(&self) -> LoadOutcome {
        let cache = &self.inner.cache;
        if let Some(entry) = cache.read().await {
            let age = entry.age(cache.now());
            log::debug!("Serving {} cached posts ({}s old)", entry.posts.len(), age.as_secs());
            if age >= self.inner.refresh_after {
                self.spawn_refresh().await;
            }
            return LoadOutcome::Fresh(published_newest_first(entry.posts));
        }

        match self.refresh_from_network().await {
            Ok(posts) => LoadOutcome::Fresh(posts),
            Err(e) if e.is_unreachable() => {
                log::warn!("{}", e);
                self.fallback().await
            }
            Err(e) => {
                log::warn!("Failed to load posts: {}", e);
                self.fallback().await
            }
        }
    }

    /// Forget the preferred source and load again, probing every source.
    pub async fn retry(&self) -> LoadOutcome {
        log::info!("Retrying with a full source probe");
        self.inner.cache.invalidate_preference().await;
        self.load_posts().await
    }

    /// Fetch the markdown body of a post.
    ///
    /// Paths still relative (posts served by the local source) resolve
    /// against the site origin.
    pub async fn fetch_post_body(&self, post: &PostRecord) -> Result<String> {
        let url = absolutize(&self.inner.origin, &post.path);
        self.inner.fetcher.fetch_text(&url).await
    }

    /// Wait for the background refresh in flight, if any.
    pub async fn wait_for_refresh(&self) {
        let handle = self.inner.refresh.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log::warn!("Background refresh task failed: {}", e);
            }
        }
    }

    /// Select a source, fetch and validate its index, and replace the cache.
    async fn refresh_from_network(&self) -> Result<Vec<PostRecord>> {
        let source = self.inner.selector.select_best_source().await?;
        let body = self.inner.fetcher.fetch_index(&source).await?;

        let document = parse_index(&body)?;
        if document.quarantined > 0 {
            log::warn!(
                "{} of {} index records from {} failed validation",
                document.quarantined,
                document.quarantined + document.posts.len(),
                source.name
            );
        }

        let posts = published_newest_first(
            document
                .posts
                .into_iter()
                .map(|post| post.with_absolute_paths(&source.base_url)),
        );
        self.inner.cache.write(&posts).await;

        log::info!("Loaded {} published posts from {}", posts.len(), source.name);
        Ok(posts)
    }

    async fn fallback(&self) -> LoadOutcome {
        match self.inner.cache.read_stale().await {
            Some(entry) => {
                log::warn!(
                    "Showing cached content from {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
                );
                LoadOutcome::Degraded(published_newest_first(entry.posts))
            }
            None => LoadOutcome::Offline {
                attempted: self.inner.selector.registry().names(),
            },
        }
    }

    async fn spawn_refresh(&self) {
        let mut slot = self.inner.refresh.lock().await;
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let service = self.clone();
        *slot = Some(tokio::spawn(async move {
            match service.refresh_from_network().await {
                Ok(posts) => log::debug!("Background refresh cached {} posts", posts.len()),
                Err(e) => log::debug!("Background refresh failed: {}", e),
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ContentSource, PostStatus, make_post};
    use crate::services::selector::tests::FakeProber;
    use crate::storage::{KeyValueStore, MemoryStore, keys};
    use crate::utils::clock::{Clock, ManualClock};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WINDOW: Duration = Duration::from_secs(300);
    const REFRESH_AFTER: Duration = Duration::from_secs(240);
    const ORIGIN: &str = "https://blog.example.com";
    const MIRROR: &str = "https://mirror.example.com/gh/me/blog@main";

    #[derive(Default)]
    struct FakeFetcher {
        bodies: StdMutex<HashMap<String, Vec<u8>>>,
        index_calls: AtomicUsize,
        text_urls: StdMutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn serve(&self, source: &str, posts: &[PostRecord]) {
            self.serve_raw(source, serde_json::to_vec(posts).unwrap());
        }

        fn serve_raw(&self, source: &str, body: Vec<u8>) {
            self.bodies.lock().unwrap().insert(source.to_string(), body);
        }

        fn index_calls(&self) -> usize {
            self.index_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentFetcher for FakeFetcher {
        async fn fetch_index(&self, source: &ContentSource) -> Result<Vec<u8>> {
            self.index_calls.fetch_add(1, Ordering::SeqCst);
            self.bodies
                .lock()
                .unwrap()
                .get(&source.name)
                .cloned()
                .ok_or_else(|| AppError::HttpStatus {
                    url: source.base_url.clone(),
                    status: 404,
                })
        }

        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.text_urls.lock().unwrap().push(url.to_string());
            Ok(format!("# body of {url}"))
        }
    }

    struct Harness {
        service: ContentService,
        prober: Arc<FakeProber>,
        fetcher: Arc<FakeFetcher>,
        clock: Arc<ManualClock>,
        store: Arc<MemoryStore>,
    }

    fn harness(reachable: &[&str]) -> Harness {
        let registry = Arc::new(
            SourceRegistry::new(vec![
                ContentSource::new("Local", "", 1, "Same origin"),
                ContentSource::new("Mirror", MIRROR, 2, "CDN mirror"),
            ])
            .unwrap(),
        );
        let prober = Arc::new(FakeProber::reaching(reachable));
        let fetcher = Arc::new(FakeFetcher::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(ContentCache::new(store.clone(), clock.clone(), WINDOW));

        let selector = SourceSelector::new(registry, prober.clone(), cache.clone());
        let service = ContentService::new(selector, fetcher.clone(), cache, ORIGIN, REFRESH_AFTER);
        Harness {
            service,
            prober,
            fetcher,
            clock,
            store,
        }
    }

    fn index() -> Vec<PostRecord> {
        vec![
            make_post("vector-db", "2025-01-20", PostStatus::Published),
            make_post("mcp", "2025-05-09", PostStatus::Published),
            make_post("wip", "2025-06-01", PostStatus::Draft),
            make_post("humanize", "2025-01-16", PostStatus::Published),
        ]
    }

    fn ids(posts: &[PostRecord]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_from_mirror_rewrites_sorts_and_filters() {
        let h = harness(&["Mirror"]);
        h.fetcher.serve("Mirror", &index());

        let posts = match h.service.load_posts().await {
            LoadOutcome::Fresh(posts) => posts,
            other => panic!("expected fresh posts, got {other:?}"),
        };

        assert_eq!(ids(&posts), vec!["mcp", "vector-db", "humanize"]);
        assert_eq!(posts[0].path, format!("{MIRROR}/posts/mcp/README.md"));
        assert_eq!(
            posts[0].cover.as_deref(),
            Some(format!("{MIRROR}/posts/mcp/cover.png").as_str())
        );
        assert_eq!(
            h.service.cache().preferred_source().await.as_deref(),
            Some("Mirror")
        );

        let cached = h.service.cache().read_stale().await.unwrap();
        assert_eq!(cached.posts, posts);
    }

    #[tokio::test]
    async fn test_local_source_keeps_relative_paths() {
        let h = harness(&["Local", "Mirror"]);
        h.fetcher.serve("Local", &index());

        let posts = h.service.load_posts().await.into_posts();
        assert_eq!(posts[0].path, "posts/mcp/README.md");
    }

    #[tokio::test]
    async fn test_second_load_within_window_uses_cache() {
        let h = harness(&["Mirror"]);
        h.fetcher.serve("Mirror", &index());

        let first = h.service.load_posts().await;
        h.clock.advance(Duration::from_secs(60));
        h.prober.reset_calls();
        let second = h.service.load_posts().await;
        h.service.wait_for_refresh().await;

        assert_eq!(first, second);
        assert_eq!(h.fetcher.index_calls(), 1);
        assert!(h.prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cached_entry_served_without_network() {
        let h = harness(&["Mirror"]);
        h.service.cache().write(&index()).await;
        h.clock.advance(Duration::from_secs(60));

        let outcome = h.service.load_posts().await;
        h.service.wait_for_refresh().await;

        assert_eq!(
            outcome,
            LoadOutcome::Fresh(published_newest_first(index()))
        );
        assert_eq!(outcome.posts().len(), 3);
        assert_eq!(h.fetcher.index_calls(), 0);
        assert!(h.prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_aging_cache_hit_refreshes_in_background() {
        let h = harness(&["Mirror"]);
        h.fetcher.serve("Mirror", &index());
        h.service.load_posts().await;

        let mut updated = index();
        updated.push(make_post("newest", "2025-07-01", PostStatus::Published));
        h.fetcher.serve("Mirror", &updated);
        h.clock.advance(Duration::from_secs(250));

        let outcome = h.service.load_posts().await;
        assert_eq!(outcome.posts().len(), 3);

        h.service.wait_for_refresh().await;
        assert_eq!(h.fetcher.index_calls(), 2);

        let refreshed = h.service.load_posts().await;
        assert_eq!(refreshed.posts()[0].id, "newest");
    }

    #[tokio::test]
    async fn test_expired_cache_served_degraded_when_all_unreachable() {
        let h = harness(&[]);
        h.service.cache().write(&index()).await;
        h.clock.advance(Duration::from_secs(3600));

        let outcome = h.service.load_posts().await;
        assert!(outcome.is_degraded());
        assert_eq!(ids(outcome.posts()), vec!["mcp", "vector-db", "humanize"]);
    }

    #[tokio::test]
    async fn test_offline_without_cache() {
        let h = harness(&[]);

        let outcome = h.service.load_posts().await;
        assert_eq!(
            outcome,
            LoadOutcome::Offline {
                attempted: vec!["Local".to_string(), "Mirror".to_string()]
            }
        );
        assert!(outcome.posts().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_stale_cache() {
        let h = harness(&["Mirror"]);
        h.service.cache().write(&index()).await;
        h.clock.advance(WINDOW);
        h.fetcher.serve_raw("Mirror", b"<html>rate limited</html>".to_vec());

        let outcome = h.service.load_posts().await;
        assert!(outcome.is_degraded());
        assert_eq!(h.fetcher.index_calls(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_a_miss() {
        let h = harness(&["Mirror"]);
        h.fetcher.serve("Mirror", &index());
        h.service.cache().write(&index()).await;
        h.store.set(keys::POSTS, "[{\"broken\"").await.unwrap();

        let outcome = h.service.load_posts().await;
        assert_eq!(outcome.posts().len(), 3);
        assert_eq!(h.fetcher.index_calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_forgets_preferred_source() {
        let h = harness(&["Mirror"]);
        h.fetcher.serve("Mirror", &index());
        h.fetcher.serve("Local", &index());
        h.service.load_posts().await;

        h.prober.set_reachable(&["Local", "Mirror"]);
        h.clock.advance(WINDOW);
        h.prober.reset_calls();

        let outcome = h.service.retry().await;
        assert_eq!(outcome.posts()[0].path, "posts/mcp/README.md");
        assert_eq!(h.prober.calls().len(), 2);
        assert_eq!(
            h.service.cache().preferred_source().await.as_deref(),
            Some("Local")
        );
    }

    #[tokio::test]
    async fn test_fetch_post_body_resolves_relative_paths() {
        let h = harness(&["Local"]);
        let local = make_post("a", "2025-01-01", PostStatus::Published);
        let mirrored = local.clone().with_absolute_paths(MIRROR);

        h.service.fetch_post_body(&local).await.unwrap();
        h.service.fetch_post_body(&mirrored).await.unwrap();

        let urls = h.fetcher.text_urls.lock().unwrap().clone();
        assert_eq!(
            urls,
            vec![
                format!("{ORIGIN}/posts/a/README.md"),
                format!("{MIRROR}/posts/a/README.md"),
            ]
        );
    }

    #[tokio::test]
    async fn test_cache_timestamp_follows_clock() {
        let h = harness(&["Mirror"]);
        h.fetcher.serve("Mirror", &index());
        h.service.load_posts().await;

        let stored = h.store.get(keys::TIMESTAMP).await.unwrap().unwrap();
        assert_eq!(stored, h.clock.now().timestamp_millis().to_string());
    }
}
