// src/pipeline/load.rs

//! Post listing: load, search, paginate and render.

use crate::error::Result;
use crate::models::PostRecord;
use crate::services::query::{POSTS_PER_PAGE, paginate, search};
use crate::services::{ContentService, LoadOutcome};
use crate::utils::truncate_graphemes;

const SUMMARY_GRAPHEMES: usize = 80;

/// How to present a post listing.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Search query applied before pagination
    pub search: Option<String>,
    /// 1-based page number
    pub page: usize,
    /// Emit all matching posts as JSON instead of a text page
    pub json: bool,
}

/// Load posts and print a listing.
pub async fn run_load(service: &ContentService, options: &ListOptions) -> Result<()> {
    let outcome = service.load_posts().await;
    print!("{}", render_outcome(&outcome, options)?);
    service.wait_for_refresh().await;
    Ok(())
}

/// Forget the preferred source, reload and print a listing.
pub async fn run_retry(service: &ContentService, options: &ListOptions) -> Result<()> {
    let outcome = service.retry().await;
    print!("{}", render_outcome(&outcome, options)?);
    service.wait_for_refresh().await;
    Ok(())
}

/// Render a load outcome: a warning for degraded data, an offline panel, or
/// one page of matching posts.
pub fn render_outcome(outcome: &LoadOutcome, options: &ListOptions) -> Result<String> {
    let posts = match outcome {
        LoadOutcome::Offline { attempted } => return Ok(render_offline(attempted)),
        LoadOutcome::Fresh(posts) | LoadOutcome::Degraded(posts) => posts,
    };

    let matches: Vec<PostRecord> = match options.search.as_deref() {
        Some(query) => search(posts, query).into_iter().cloned().collect(),
        None => posts.clone(),
    };

    if options.json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&matches)?));
    }

    let mut out = String::new();
    if outcome.is_degraded() {
        out.push_str("! Network unavailable, showing cached content.\n\n");
    }

    if matches.is_empty() {
        out.push_str("No posts found.\n");
        return Ok(out);
    }

    let page = paginate(&matches, options.page, POSTS_PER_PAGE);
    for post in page.items {
        out.push_str(&render_post(post));
        out.push('\n');
    }
    out.push_str(&format!(
        "Page {}/{} ({} posts)\n",
        page.page, page.total_pages, page.total_items
    ));
    Ok(out)
}

fn render_post(post: &PostRecord) -> String {
    let mut meta = vec![post.category.as_str(), post.reading_time.as_str()];
    meta.retain(|m| !m.is_empty());

    let mut out = format!("[{}] {}", post.date, post.title);
    if !meta.is_empty() {
        out.push_str(&format!("  ({})", meta.join(" · ")));
    }
    out.push('\n');
    out.push_str(&format!("    id: {}\n", post.id));
    if !post.summary.is_empty() {
        out.push_str(&format!(
            "    {}\n",
            truncate_graphemes(&post.summary, SUMMARY_GRAPHEMES)
        ));
    }
    if !post.tags.is_empty() {
        out.push_str(&format!("    tags: {}\n", post.tags.join(", ")));
    }
    out
}

fn render_offline(attempted: &[String]) -> String {
    let mut out = String::from("Offline: could not load posts from any source.\n");
    out.push_str("Tried:\n");
    for name in attempted {
        out.push_str(&format!("    - {name}\n"));
    }
    out.push_str("Run `postfeed retry` to probe every source again.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostStatus, make_post};

    fn posts(count: usize) -> Vec<PostRecord> {
        (0..count)
            .map(|i| make_post(&format!("post-{i}"), "2025-01-01", PostStatus::Published))
            .collect()
    }

    #[test]
    fn test_render_offline_lists_sources() {
        let outcome = LoadOutcome::Offline {
            attempted: vec!["Local".to_string(), "GitHub".to_string()],
        };
        let text = render_outcome(&outcome, &ListOptions::default()).unwrap();
        assert!(text.starts_with("Offline"));
        assert!(text.contains("- Local"));
        assert!(text.contains("- GitHub"));
        assert!(text.contains("postfeed retry"));
    }

    #[test]
    fn test_render_degraded_warns() {
        let outcome = LoadOutcome::Degraded(posts(2));
        let text = render_outcome(&outcome, &ListOptions::default()).unwrap();
        assert!(text.starts_with("! Network unavailable"));
        assert!(text.contains("Page 1/1 (2 posts)"));
    }

    #[test]
    fn test_render_second_page() {
        let outcome = LoadOutcome::Fresh(posts(8));
        let options = ListOptions {
            page: 2,
            ..ListOptions::default()
        };
        let text = render_outcome(&outcome, &options).unwrap();
        assert!(text.contains("id: post-6"));
        assert!(!text.contains("id: post-0"));
        assert!(text.contains("Page 2/2 (8 posts)"));
    }

    #[test]
    fn test_render_search_json() {
        let mut list = posts(3);
        list[1].title = "Qdrant 实战".to_string();
        let options = ListOptions {
            search: Some("qdrant".to_string()),
            json: true,
            ..ListOptions::default()
        };

        let text = render_outcome(&LoadOutcome::Fresh(list), &options).unwrap();
        let parsed: Vec<PostRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "post-1");
    }

    #[test]
    fn test_render_no_matches() {
        let options = ListOptions {
            search: Some("nothing".to_string()),
            ..ListOptions::default()
        };
        let text = render_outcome(&LoadOutcome::Fresh(posts(2)), &options).unwrap();
        assert_eq!(text, "No posts found.\n");
    }
}
