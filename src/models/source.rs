//! Content origin definition.

use serde::{Deserialize, Serialize};

/// A candidate origin hosting a mirror of the blog's content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentSource {
    /// Human-readable label, unique within the registry
    pub name: String,

    /// Origin prefix; empty means the same origin as the site itself
    #[serde(default)]
    pub base_url: String,

    /// Lower value = more preferred
    pub priority: u32,

    /// Free-text label for UI and logging
    #[serde(default)]
    pub description: String,
}

impl ContentSource {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        priority: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            priority,
            description: description.into(),
        }
    }

    /// True for the same-origin deployment.
    pub fn is_local(&self) -> bool {
        self.base_url.trim().is_empty()
    }

    /// Resolve a resource path on this source.
    ///
    /// Local sources resolve against `origin`, the address of the deployed site.
    pub fn resource_url(&self, origin: &str, path: &str) -> String {
        let base = if self.is_local() {
            origin
        } else {
            self.base_url.as_str()
        };
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches("./").trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local() {
        assert!(ContentSource::new("Local", "", 1, "").is_local());
        assert!(!ContentSource::new("CDN", "https://cdn.example.com", 2, "").is_local());
    }

    #[test]
    fn test_resource_url() {
        let cdn = ContentSource::new("CDN", "https://cdn.example.com/gh/me/blog@main/", 2, "");
        assert_eq!(
            cdn.resource_url("https://blog.example.com", "posts/posts.json"),
            "https://cdn.example.com/gh/me/blog@main/posts/posts.json"
        );

        let local = ContentSource::new("Local", "", 1, "");
        assert_eq!(
            local.resource_url("https://blog.example.com/", "/posts/posts.json"),
            "https://blog.example.com/posts/posts.json"
        );
    }
}
