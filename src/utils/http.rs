// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

/// Create a configured asynchronous HTTP client.
///
/// No client-wide timeout is set; probes and fetches attach their own.
pub fn create_async_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(Duration::from_millis(config.probe_timeout_ms))
        .build()?;
    Ok(client)
}

/// GET a URL and return its body, failing on non-success status.
pub async fn fetch_bytes(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let response = client.get(url).timeout(timeout).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

/// HEAD a URL and report the status code.
pub async fn head_status(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<u16> {
    let response = client.head(url).timeout(timeout).send().await?;
    Ok(response.status().as_u16())
}
