use anyhow::{anyhow, Result};
use mime::Mime;
use reqwest::Client;
use std::path::Path;
use url::Url;

use super::rate_limit::RateLimiter;

/// GETs `url` under the rate limiter and returns the body as text.
pub async fn fetch_text(
    client: &Client,
    url: &Url,
    user_agent: &str,
    accept: Mime,
    rate_limiter: &RateLimiter,
) -> Result<String> {
    let _permit = rate_limiter.acquire().await?;
    log::debug!("Fetching URL: {}", url);

    let response = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, user_agent)
        .header(reqwest::header::ACCEPT, accept.as_ref())
        .header(reqwest::header::ACCEPT_ENCODING, "gzip, deflate")
        .send()
        .await?;

    log::debug!("Response status: {}", response.status());

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP request to {} failed with status: {}",
            url,
            response.status()
        ));
    }

    let content = response.text().await?;
    log::debug!("Received content length: {}", content.len());
    Ok(content)
}

/// Fetches `url`, writes the body to `filepath` and returns it. JSON bodies
/// are checked to parse before they are written, so a truncated response
/// never replaces a good cached copy.
pub async fn fetch_and_save(
    client: &Client,
    url: &Url,
    filepath: &Path,
    user_agent: &str,
    accept: Mime,
    rate_limiter: &RateLimiter,
) -> Result<String> {
    let is_json = accept == mime::APPLICATION_JSON;
    let content = fetch_text(client, url, user_agent, accept, rate_limiter).await?;

    if is_json {
        serde_json::from_str::<serde_json::Value>(&content)
            .map_err(|e| anyhow!("Invalid JSON from {}: {}", url, e))?;
    }

    save(filepath, &content)?;
    Ok(content)
}

pub fn save(filepath: &Path, content: &str) -> Result<()> {
    if let Some(parent) = filepath.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(filepath, content)?;
    log::debug!("Saved content to {:?}", filepath);
    Ok(())
}

/// Fetches fresh content, falling back to the copy at `filepath` when the
/// request fails and a copy exists.
pub async fn fetch_or_cached(
    client: &Client,
    url: &Url,
    filepath: &Path,
    user_agent: &str,
    accept: Mime,
    rate_limiter: &RateLimiter,
) -> Result<String> {
    match fetch_and_save(client, url, filepath, user_agent, accept, rate_limiter).await {
        Ok(content) => Ok(content),
        Err(e) => {
            if !filepath.exists() {
                log::error!("Failed to fetch {} and no local file exists: {}", url, e);
                return Err(e);
            }
            log::warn!(
                "Error fetching from {} but local file exists, using cached version: {}",
                url,
                e
            );
            Ok(std::fs::read_to_string(filepath)?)
        }
    }
}
