//! Metadata resolution collaborators.
//!
//! Turns an item descriptor into its off-chain metadata:
//! - HTTP resolver for JSON metadata (with IPFS / Arweave gateway rewriting)
//! - Mock resolver for testing

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpMetadataResolver;
pub use mock::MockResolver;
pub use traits::{MetadataResolver, ResolutionError};
