//! Core trait for ledger clients.

use async_trait::async_trait;

use crate::types::{ItemDescriptor, OwnerIdentity};

/// Error types for ledger queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Owner address rejected by the ledger
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success HTTP status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Lists every item owned by an identity, in a stable order.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Endpoint identifier, for logs.
    fn id(&self) -> &str;

    async fn list_items_owned_by(
        &self,
        owner: &OwnerIdentity,
    ) -> Result<Vec<ItemDescriptor>, LedgerError>;
}
