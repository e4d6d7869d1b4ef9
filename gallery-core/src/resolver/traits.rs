//! Core trait for metadata resolvers.

use async_trait::async_trait;

use crate::types::{ItemDescriptor, ItemMetadata};

/// Error types for a single item's metadata resolution.
///
/// Cloneable so a failed unit can hand its error to every observer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// The descriptor carries no metadata location
    #[error("Item has no metadata URI")]
    MissingUri,

    /// The metadata location uses a scheme we cannot fetch
    #[error("Unsupported metadata URI: {0}")]
    UnsupportedUri(String),

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Metadata host answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body was not valid metadata JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The resolution task ended without reporting an outcome
    #[error("Resolution aborted")]
    Aborted,
}

/// Resolves one item's off-chain metadata.
///
/// Implementations should be safe to call for the same item more than once,
/// though the coordinator only ever calls once per item per working set.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, item: &ItemDescriptor) -> Result<ItemMetadata, ResolutionError>;
}
