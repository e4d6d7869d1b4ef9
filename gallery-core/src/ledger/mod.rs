//! Ledger client abstraction.
//!
//! Lists the items held by an owner address:
//! - DAS (`getAssetsByOwner`) JSON-RPC client
//! - Mock ledger for testing

pub mod das;
pub mod mock;
pub mod traits;

pub use das::DasLedgerClient;
pub use mock::MockLedger;
pub use traits::{LedgerClient, LedgerError};
