use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use plexfetch_models::{MediaContainerResponse, MediaNode};

use crate::error::ApiError;

/// Authenticated metadata access against one resolved server.
///
/// `fetch_nodes` returns `Ok(None)` for any non-200 status: absence is a
/// value, and it is the caller's decision whether a missing branch is fatal.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_nodes(&self, path: &str) -> Result<Option<Vec<MediaNode>>, ApiError>;
}

/// HTTP client bound to one server's resolved base URL and access token.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl ServerClient {
    pub fn new(http: Client, base_url: String, access_token: String) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a streaming GET for a download; the body is consumed by the
    /// caller chunk by chunk.
    pub async fn stream(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .get(url)
            .header("X-Plex-Token", &self.access_token)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl MetadataProvider for ServerClient {
    async fn fetch_nodes(&self, path: &str) -> Result<Option<Vec<MediaNode>>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("X-Plex-Token", &self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Metadata fetch for {} returned HTTP {}", path, status);
            return Ok(None);
        }

        let body: MediaContainerResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let nodes = body
            .media_container
            .metadata
            .into_iter()
            .map(MediaNode::from_raw)
            .collect();
        Ok(Some(nodes))
    }
}
