//! Configuration for the gallery viewer
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use gallery_core::config::MAINNET_RPC_URL;
use gallery_core::GalleryConfig;

/// Gallery - page through the assets held by a ledger address
#[derive(Parser, Debug, Clone)]
#[command(name = "gallery")]
#[command(about = "Paginated viewer for assets owned by a Solana address")]
pub struct Args {
    /// RPC endpoint implementing getAssetsByOwner
    #[arg(long, env = "GALLERY_RPC_URL", default_value = MAINNET_RPC_URL)]
    pub rpc_url: String,

    /// Owner address to fetch on startup (empty to skip)
    #[arg(
        long,
        env = "GALLERY_OWNER",
        default_value = "Geh5Ss5knQGym81toYGXDbH3MFU2JCMK7E4QyeBHor1b"
    )]
    pub owner: String,

    /// Items per page
    #[arg(long, env = "GALLERY_PAGE_SIZE", default_value = "1")]
    pub page_size: usize,

    /// Image shown for items without resolved metadata
    #[arg(long, env = "GALLERY_FALLBACK_IMAGE", default_value = "/fallbackImage.jpg")]
    pub fallback_image: String,

    /// Gateway used for ipfs:// metadata URIs
    #[arg(long, env = "IPFS_GATEWAY", default_value = "https://ipfs.io/ipfs/")]
    pub ipfs_gateway: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(format!("RPC URL must be http(s): {}", self.rpc_url));
        }
        self.gallery_config().validate().map_err(|e| e.to_string())
    }

    pub fn gallery_config(&self) -> GalleryConfig {
        GalleryConfig::default()
            .with_page_size(self.page_size)
            .with_fallback_image(self.fallback_image.clone())
            .with_ipfs_gateway(self.ipfs_gateway.clone())
            .with_request_timeout_ms(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["gallery"]).unwrap();
        assert_eq!(args.rpc_url, MAINNET_RPC_URL);
        assert_eq!(args.page_size, 1);
        assert_eq!(args.owner, "Geh5Ss5knQGym81toYGXDbH3MFU2JCMK7E4QyeBHor1b");
        assert!(args.validate().is_ok());
        assert_eq!(args.gallery_config().fallback_image, "/fallbackImage.jpg");
    }

    #[test]
    fn test_owner_flag_overrides_default() {
        let args = Args::try_parse_from([
            "gallery",
            "--owner",
            "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
        ])
        .unwrap();
        assert_eq!(args.owner, "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let args = Args::try_parse_from(["gallery", "--page-size", "0"]).unwrap();
        assert!(args.validate().unwrap_err().contains("page_size"));
    }

    #[test]
    fn test_rejects_non_http_rpc() {
        let args = Args::try_parse_from(["gallery", "--rpc-url", "ws://localhost:8900"]).unwrap();
        assert!(args.validate().is_err());
    }
}
