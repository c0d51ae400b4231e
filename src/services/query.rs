//! Search and pagination over a loaded post list.

use crate::models::PostRecord;

/// Posts per page in listings.
pub const POSTS_PER_PAGE: usize = 6;

/// One page of a post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub items: &'a [PostRecord],
    /// 1-based page number actually shown
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Case-insensitive substring search over title, summary, category and tags.
///
/// A blank query matches everything.
pub fn search<'a>(posts: &'a [PostRecord], query: &str) -> Vec<&'a PostRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return posts.iter().collect();
    }

    posts
        .iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&needle)
                || post.summary.to_lowercase().contains(&needle)
                || post.category.to_lowercase().contains(&needle)
                || post
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Slice out a 1-based page, clamping out-of-range page numbers.
pub fn paginate(posts: &[PostRecord], page: usize, per_page: usize) -> Page<'_> {
    let per_page = per_page.max(1);
    let total_pages = posts.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(posts.len());
    Page {
        items: &posts[start.min(end)..end],
        page,
        total_pages,
        total_items: posts.len(),
    }
}

pub fn find_by_id<'a>(posts: &'a [PostRecord], id: &str) -> Option<&'a PostRecord> {
    posts.iter().find(|post| post.id == id)
}
