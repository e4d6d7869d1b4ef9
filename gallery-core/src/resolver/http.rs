//! HTTP metadata resolver.
//!
//! Fetches the JSON document the descriptor's URI points at. Content-addressed
//! URIs are rewritten to HTTP gateways first:
//! - `ipfs://<cid>/<path>` → `{ipfs_gateway}<cid>/<path>`
//! - `ar://<id>` → `{arweave_gateway}<id>`

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::traits::*;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::types::{ItemDescriptor, ItemMetadata};

/// Resolver that downloads metadata JSON over HTTP.
pub struct HttpMetadataResolver {
    client: Client,
    ipfs_gateway: String,
    arweave_gateway: String,
}

impl HttpMetadataResolver {
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| GalleryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ipfs_gateway: config.ipfs_gateway.clone(),
            arweave_gateway: config.arweave_gateway.clone(),
        })
    }

    /// Map a metadata URI to a fetchable HTTP(S) URL.
    fn fetch_url(&self, uri: &str) -> std::result::Result<String, ResolutionError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ResolutionError::MissingUri);
        }

        if let Some(rest) = uri.strip_prefix("ipfs://") {
            let rest = rest.strip_prefix("ipfs/").unwrap_or(rest);
            return Ok(join_gateway(&self.ipfs_gateway, rest));
        }
        if let Some(rest) = uri.strip_prefix("ar://") {
            return Ok(join_gateway(&self.arweave_gateway, rest));
        }
        if uri.starts_with("https://") || uri.starts_with("http://") {
            return Ok(uri.to_string());
        }

        Err(ResolutionError::UnsupportedUri(uri.to_string()))
    }
}

fn join_gateway(gateway: &str, path: &str) -> String {
    format!("{}/{}", gateway.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[async_trait]
impl MetadataResolver for HttpMetadataResolver {
    async fn resolve(&self, item: &ItemDescriptor) -> std::result::Result<ItemMetadata, ResolutionError> {
        let uri = item.uri.as_deref().ok_or(ResolutionError::MissingUri)?;
        let url = self.fetch_url(uri)?;
        debug!(address = %item.address, url = %url, "Fetching item metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ResolutionError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .json::<ItemMetadata>()
            .await
            .map_err(|e| ResolutionError::Parse(e.to_string()))
    }
}
