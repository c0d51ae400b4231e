//! Ordered registry of content origins.

use crate::error::Result;
use crate::models::{ContentSource, validate_sources};

/// Static, ordered set of content origins. Registry order breaks priority ties.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<ContentSource>,
}

impl SourceRegistry {
    /// Build a registry, rejecting empty lists, duplicate names, zero
    /// priorities and relative base URLs.
    pub fn new(sources: Vec<ContentSource>) -> Result<Self> {
        validate_sources(&sources)?;
        Ok(Self { sources })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Find a source by name.
    pub fn find(&self, name: &str) -> Option<&ContentSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }
}
