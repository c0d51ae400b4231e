// src/pipeline/show.rs

use crate::error::{AppError, Result};
use crate::services::{ContentService, LoadOutcome};
use crate::services::query::find_by_id;

/// Print the markdown body of one post.
pub async fn run_show(service: &ContentService, id: &str) -> Result<()> {
    let outcome = service.load_posts().await;
    if let LoadOutcome::Offline { attempted } = &outcome {
        return Err(AppError::NoReachableSource {
            attempted: attempted.clone(),
        });
    }

    let post = find_by_id(outcome.posts(), id)
        .ok_or_else(|| AppError::not_found(format!("post '{id}'")))?;
    log::info!("Fetching body of '{}' from {}", post.id, post.path);

    let body = service.fetch_post_body(post).await?;
    println!("# {}\n", post.title);
    println!("{}", body.trim_end());

    service.wait_for_refresh().await;
    Ok(())
}
