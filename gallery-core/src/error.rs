//! Error types for the gallery engine

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::resolver::ResolutionError;

/// Result type for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Gallery error types
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Owner identity is not a valid ledger address
    #[error("Invalid owner identity: {0:?}")]
    InvalidIdentity(String),

    /// Ledger query failed; the previous list is kept
    #[error("Fetch failed: {0}")]
    FetchFailed(#[source] LedgerError),

    /// A single item's metadata could not be resolved
    #[error("Resolution failed for {item_id}: {cause}")]
    ResolutionFailed {
        item_id: String,
        cause: ResolutionError,
    },

    /// Navigation requested before any list was loaded
    #[error("No owner list loaded")]
    NoWorkingSet,

    /// The session task has stopped
    #[error("Gallery session closed")]
    SessionClosed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<LedgerError> for GalleryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidIdentity(identity) => GalleryError::InvalidIdentity(identity),
            other => GalleryError::FetchFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_identity_error_maps_to_invalid_identity() {
        let err: GalleryError = LedgerError::InvalidIdentity("nope".into()).into();
        assert!(matches!(err, GalleryError::InvalidIdentity(ref s) if s == "nope"));
    }

    #[test]
    fn test_ledger_network_error_maps_to_fetch_failed() {
        let err: GalleryError = LedgerError::Network("connection reset".into()).into();
        assert!(matches!(err, GalleryError::FetchFailed(LedgerError::Network(_))));
        assert_eq!(err.to_string(), "Fetch failed: Network error: connection reset");
    }
}
