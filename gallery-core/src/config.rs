//! Engine configuration

use crate::error::{GalleryError, Result};

/// Solana mainnet-beta RPC endpoint.
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Configuration for the gallery engine and its HTTP collaborators.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Items per page
    pub page_size: usize,
    /// Image shown when an item has no resolved image
    pub fallback_image: String,
    /// Gateway prefix for `ipfs://` metadata URIs
    pub ipfs_gateway: String,
    /// Gateway prefix for `ar://` metadata URIs
    pub arweave_gateway: String,
    /// Per-request timeout for ledger and metadata calls (ms)
    pub request_timeout_ms: u64,
    /// Assets requested per `getAssetsByOwner` page
    pub das_page_limit: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: 1,
            fallback_image: "/fallbackImage.jpg".to_string(),
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
            arweave_gateway: "https://arweave.net/".to_string(),
            request_timeout_ms: 30_000,
            das_page_limit: 1000,
        }
    }
}

impl GalleryConfig {
    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the fallback image.
    pub fn with_fallback_image(mut self, image: impl Into<String>) -> Self {
        self.fallback_image = image.into();
        self
    }

    /// Set the IPFS gateway prefix.
    pub fn with_ipfs_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.ipfs_gateway = gateway.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GalleryError::Config("page_size must be at least 1".into()));
        }
        if self.das_page_limit == 0 {
            return Err(GalleryError::Config("das_page_limit must be at least 1".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(GalleryError::Config("request_timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GalleryConfig::default();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.fallback_image, "/fallbackImage.jpg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = GalleryConfig::default().with_page_size(0);
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));
    }
}
