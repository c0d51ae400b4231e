//! Post index records and their validation.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::url::absolutize;

/// Publication status of a post. Only `Published` posts reach readers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
    #[serde(other)]
    Other,
}

/// One entry of the post index (`posts/posts.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Stable unique identifier
    pub id: String,

    /// Post title
    pub title: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Publication date, `YYYY-MM-DD` optionally followed by a time
    pub date: String,

    /// Short summary shown in listings
    #[serde(default)]
    pub summary: String,

    /// Tags in display order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Cover image path (relative or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    /// Markdown content path (relative or absolute)
    pub path: String,

    /// Display string such as "25 分钟"
    #[serde(default)]
    pub reading_time: String,

    pub status: PostStatus,
}

impl PostRecord {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Parsed calendar date, if the date string starts with `YYYY-MM-DD`.
    pub fn published_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Check the fields a listing cannot do without.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("post id is empty"));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::validation(format!("post '{}' has no title", self.id)));
        }
        if self.path.trim().is_empty() {
            return Err(AppError::validation(format!("post '{}' has no path", self.id)));
        }
        if self.published_date().is_none() {
            return Err(AppError::validation(format!(
                "post '{}' has an unparseable date '{}'",
                self.id, self.date
            )));
        }
        Ok(())
    }

    /// Rewrite relative `cover` and `path` against an origin's base URL.
    ///
    /// Values that are already absolute are left untouched, so applying this
    /// twice gives the same result as applying it once.
    pub fn with_absolute_paths(mut self, base_url: &str) -> Self {
        self.path = absolutize(base_url, &self.path);
        self.cover = self.cover.map(|cover| absolutize(base_url, &cover));
        self
    }
}

/// Result of validating an index document.
#[derive(Debug, Default)]
pub struct IndexDocument {
    /// Records that passed validation, in index order
    pub posts: Vec<PostRecord>,
    /// Number of records rejected by validation
    pub quarantined: usize,
}

/// Parse and validate an index body.
///
/// The body must be a JSON array. Elements that are missing required fields
/// or carry an unparseable date are skipped and counted as quarantined.
pub fn parse_index(body: &[u8]) -> Result<IndexDocument> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("post index is not a JSON array: {e}")))?;

    let mut document = IndexDocument::default();
    for (position, value) in values.into_iter().enumerate() {
        let record = serde_json::from_value::<PostRecord>(value)
            .map_err(AppError::from)
            .and_then(|record| record.validate().map(|_| record));

        match record {
            Ok(record) => document.posts.push(record),
            Err(e) => {
                log::warn!("Quarantined post index record #{}: {}", position, e);
                document.quarantined += 1;
            }
        }
    }
    Ok(document)
}

/// Keep published posts only, newest first.
///
/// The sort is stable; posts sharing a date keep their index order. Posts
/// with an unparseable date sink to the end.
pub fn published_newest_first(posts: impl IntoIterator<Item = PostRecord>) -> Vec<PostRecord> {
    let mut published: Vec<PostRecord> = posts.into_iter().filter(|p| p.is_published()).collect();
    published.sort_by_key(|p| Reverse(p.published_date()));
    published
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    let day = date.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
