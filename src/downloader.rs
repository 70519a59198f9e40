use crate::model::DownloadResult;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{trace, warn};

pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch `url` with a single GET bounded by `timeout`.
///
/// Only a `200 OK` response yields data. Any other status, and any transport
/// failure (timeout, DNS, reset, truncated body), is logged and returned as
/// `None` so the caller's batch keeps going. Safe to call concurrently on a
/// shared `Client`.
pub async fn download(client: &Client, url: &str, timeout: Duration) -> DownloadResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("Error for URL {}: {}", url, err);
            return None;
        }
    };

    if response.status() != StatusCode::OK {
        warn!(
            "Error: HTTP status code {} for URL: {}",
            response.status().as_u16(),
            url
        );
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => {
            trace!("Downloaded {} bytes from {}", bytes.len(), url);
            Some(bytes.to_vec())
        }
        Err(err) => {
            warn!("Error reading body for URL {}: {}", url, err);
            None
        }
    }
}
