//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ContentSource;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Post index cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Content origins in registry order
    #[serde(default = "defaults::default_sources")]
    pub sources: Vec<ContentSource>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if url::Url::parse(&self.client.origin).is_err() {
            return Err(AppError::validation(format!(
                "client.origin '{}' is not an absolute URL",
                self.client.origin
            )));
        }
        if self.client.index_path.trim().is_empty() {
            return Err(AppError::validation("client.index_path is empty"));
        }
        if self.client.probe_timeout_ms == 0 {
            return Err(AppError::validation("client.probe_timeout_ms must be > 0"));
        }
        if self.client.fetch_timeout_secs == 0 {
            return Err(AppError::validation("client.fetch_timeout_secs must be > 0"));
        }
        if self.cache.duration_secs == 0 {
            return Err(AppError::validation("cache.duration_secs must be > 0"));
        }
        if self.cache.refresh_after_secs > self.cache.duration_secs {
            return Err(AppError::validation(
                "cache.refresh_after_secs must not exceed cache.duration_secs",
            ));
        }
        validate_sources(&self.sources)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.client.probe_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.client.fetch_timeout_secs)
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache.duration_secs)
    }

    pub fn refresh_after(&self) -> Duration {
        Duration::from_secs(self.cache.refresh_after_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            sources: defaults::default_sources(),
        }
    }
}

/// Check a registry definition: non-empty, unique names, positive priorities,
/// absolute base URLs for remote sources.
pub fn validate_sources(sources: &[ContentSource]) -> Result<()> {
    if sources.is_empty() {
        return Err(AppError::validation("No content sources defined"));
    }

    let mut names = HashSet::new();
    for source in sources {
        if source.name.trim().is_empty() {
            return Err(AppError::validation("Content source with empty name"));
        }
        if !names.insert(source.name.as_str()) {
            return Err(AppError::validation(format!(
                "Duplicate content source name '{}'",
                source.name
            )));
        }
        if source.priority == 0 {
            return Err(AppError::validation(format!(
                "Content source '{}' must have a priority > 0",
                source.name
            )));
        }
        if !source.is_local() && url::Url::parse(&source.base_url).is_err() {
            return Err(AppError::validation(format!(
                "Content source '{}' has a non-absolute base_url '{}'",
                source.name, source.base_url
            )));
        }
    }
    Ok(())
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Address of the deployed site; local sources resolve against it
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// Index resource path relative to a source's base URL
    #[serde(default = "defaults::index_path")]
    pub index_path: String,

    /// Reachability probe timeout in milliseconds
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_ms: u64,

    /// Index and content fetch timeout in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            origin: defaults::origin(),
            index_path: defaults::index_path(),
            probe_timeout_ms: defaults::probe_timeout(),
            fetch_timeout_secs: defaults::fetch_timeout(),
        }
    }
}

/// Post index cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the persisted key/value entries
    #[serde(default = "defaults::store_dir")]
    pub store_dir: PathBuf,

    /// How long a cached index counts as fresh
    #[serde(default = "defaults::cache_duration")]
    pub duration_secs: u64,

    /// Age after which a cache hit also refreshes in the background
    #[serde(default = "defaults::refresh_after")]
    pub refresh_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            store_dir: defaults::store_dir(),
            duration_secs: defaults::cache_duration(),
            refresh_after_secs: defaults::refresh_after(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::ContentSource;

    // Client defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; postfeed/0.1)".into()
    }
    pub fn origin() -> String {
        "https://iamshawn.vercel.app".into()
    }
    pub fn index_path() -> String {
        "posts/posts.json".into()
    }
    pub fn probe_timeout() -> u64 {
        3_000
    }
    pub fn fetch_timeout() -> u64 {
        10
    }

    // Cache defaults
    pub fn store_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn cache_duration() -> u64 {
        5 * 60
    }
    pub fn refresh_after() -> u64 {
        4 * 60
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }

    // Canonical registry
    pub fn default_sources() -> Vec<ContentSource> {
        vec![
            ContentSource::new("Local", "", 1, "Same-origin deployment"),
            ContentSource::new(
                "Vercel",
                "https://iamshawn.vercel.app",
                2,
                "Vercel deployment",
            ),
            ContentSource::new(
                "jsDelivr",
                "https://cdn.jsdelivr.net/gh/Shawnzheng011019/iamshawn@main",
                3,
                "jsDelivr CDN mirror of the GitHub repository",
            ),
            ContentSource::new(
                "GitHub",
                "https://raw.githubusercontent.com/Shawnzheng011019/iamshawn/main",
                4,
                "GitHub raw files",
            ),
            ContentSource::new(
                "Gitee",
                "https://gitee.com/Shawnzheng011019/iamshawn/raw/master",
                5,
                "Gitee raw-file mirror",
            ),
        ]
    }
}
