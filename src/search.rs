use crate::error::Error;
use crate::model::ImageDescriptor;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

/// `tbm` value that switches the search API into image mode.
const IMAGE_SEARCH_MODE: &str = "isch";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    images_results: Vec<ImageDescriptor>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the image search API.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, DEFAULT_SEARCH_ENDPOINT)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Search for `query` and return at most `max_images` descriptors.
    ///
    /// A non-200 status, or a 200 body carrying an `error` field, is logged and
    /// yields an empty list. Transport and decode failures are returned as `Err`.
    pub async fn search(
        &self,
        query: &str,
        api_key: &str,
        max_images: usize,
    ) -> Result<Vec<ImageDescriptor>, Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("tbm", IMAGE_SEARCH_MODE), ("key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Error: search returned HTTP status {}", status.as_u16());
            return Ok(Vec::new());
        }

        let body: SearchResponse = response.json().await?;
        if let Some(message) = body.error {
            warn!("Error: search API reported '{}'", message);
            return Ok(Vec::new());
        }

        let mut results = body.images_results;
        debug!(
            "Search for '{}' returned {} results, keeping {}",
            query,
            results.len(),
            max_images.min(results.len())
        );
        results.truncate(max_images);
        Ok(results)
    }
}
