//! Digital Asset Standard ledger client.
//!
//! Calls the `getAssetsByOwner` JSON-RPC method on a Solana RPC endpoint,
//! walking result pages until a short page comes back.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::traits::*;
use crate::config::{GalleryConfig, MAINNET_RPC_URL};
use crate::error::{GalleryError, Result};
use crate::types::{ItemDescriptor, OwnerIdentity};

/// Ledger client backed by a DAS-capable RPC endpoint.
pub struct DasLedgerClient {
    client: Client,
    rpc_url: String,
    page_limit: u32,
}

impl DasLedgerClient {
    pub fn new(rpc_url: impl Into<String>, config: &GalleryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| GalleryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
            page_limit: config.das_page_limit.max(1),
        })
    }

    /// Client for the mainnet-beta cluster.
    pub fn mainnet(config: &GalleryConfig) -> Result<Self> {
        Self::new(MAINNET_RPC_URL, config)
    }

    async fn fetch_page(
        &self,
        owner: &OwnerIdentity,
        page: u32,
    ) -> std::result::Result<AssetPage, LedgerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: "gallery",
            method: "getAssetsByOwner",
            params: AssetsByOwnerParams {
                owner_address: owner.as_str(),
                page,
                limit: self.page_limit,
            },
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LedgerError::Server { status, message });
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(classify_rpc_error(owner, error));
        }

        body.result
            .ok_or_else(|| LedgerError::InvalidResponse("Missing result".to_string()))
    }
}

/// Invalid-params errors mentioning the owner mean the address was rejected.
fn classify_rpc_error(owner: &OwnerIdentity, error: RpcError) -> LedgerError {
    if error.code == INVALID_PARAMS && error.message.to_lowercase().contains("owner") {
        LedgerError::InvalidIdentity(owner.to_string())
    } else {
        LedgerError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}

const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'static str,
    params: AssetsByOwnerParams<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetsByOwnerParams<'a> {
    owner_address: &'a str,
    page: u32,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<AssetPage>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    #[serde(default)]
    items: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    id: String,
    #[serde(default)]
    content: Option<AssetContent>,
}

#[derive(Debug, Deserialize)]
struct AssetContent {
    #[serde(default)]
    json_uri: Option<String>,
    #[serde(default)]
    metadata: Option<AssetMetadata>,
}

#[derive(Debug, Deserialize)]
struct AssetMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
}

impl From<Asset> for ItemDescriptor {
    fn from(asset: Asset) -> Self {
        let content = asset.content.unwrap_or(AssetContent {
            json_uri: None,
            metadata: None,
        });
        let (name, symbol) = match content.metadata {
            Some(metadata) => (metadata.name, metadata.symbol),
            None => (None, None),
        };

        ItemDescriptor {
            address: asset.id,
            name: name.unwrap_or_default(),
            symbol: symbol.filter(|s| !s.is_empty()),
            uri: content.json_uri.filter(|uri| !uri.is_empty()),
        }
    }
}

#[async_trait]
impl LedgerClient for DasLedgerClient {
    fn id(&self) -> &str {
        &self.rpc_url
    }

    async fn list_items_owned_by(
        &self,
        owner: &OwnerIdentity,
    ) -> std::result::Result<Vec<ItemDescriptor>, LedgerError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(owner, page).await?;
            let count = batch.items.len();
            debug!(owner = %owner, page, count, "Fetched asset page");

            items.extend(batch.items.into_iter().map(ItemDescriptor::from));
            if count < self.page_limit as usize {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}
