//! Gallery Core - lazy pagination over ledger-owned assets
//!
//! Given an owner address, loads the full list of asset descriptors from the
//! ledger and pages through them, resolving off-chain metadata only for the
//! items on the visible page:
//! - Resolution happens at most once per item for the life of a list
//! - A page is ready only when every item on it has settled
//! - Per-item failures fall back to placeholder content, never fail the page
//! - Loading a new owner discards all prior page and resolution state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Gallery / GallerySession           │
//! │  (state owner, fetch / next / prev)     │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┼────────────────┐
//!      ▼           ▼                ▼
//! ┌──────────┐ ┌────────────┐ ┌──────────────────┐
//! │ Ledger   │ │ Pagination │ │ Metadata         │
//! │ Client   │ │ (window)   │ │ Coordinator      │
//! └──────────┘ └────────────┘ └────────┬─────────┘
//!                                      ▼
//!                             ┌──────────────────┐
//!                             │ MetadataResolver │
//!                             └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery_core::{Gallery, GalleryConfig, DasLedgerClient, HttpMetadataResolver};
//!
//! let config = GalleryConfig::default();
//! let ledger = DasLedgerClient::mainnet(&config)?;
//! let resolver = HttpMetadataResolver::new(&config)?;
//! let mut gallery = Gallery::new(Arc::new(ledger), Arc::new(resolver), config);
//!
//! gallery.load_owner_items("Geh5Ss5knQGym81toYGXDbH3MFU2JCMK7E4QyeBHor1b").await?;
//! gallery.ensure_current_page().await;
//! println!("{:?}", gallery.view());
//!
//! gallery.next_page()?;
//! gallery.ensure_current_page().await;
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod gallery;
pub mod ledger;
pub mod pagination;
pub mod resolver;
pub mod session;
pub mod types;
pub mod unit;
pub mod working_set;

// Re-export main types for convenience
pub use config::GalleryConfig;
pub use coordinator::{MetadataCoordinator, PageJob, PageReady};
pub use error::{GalleryError, Result};
pub use gallery::{FetchJob, FetchOutcome, Gallery, GalleryView};
pub use ledger::{DasLedgerClient, LedgerClient, LedgerError, MockLedger};
pub use pagination::{can_go_next, can_go_prev, compute_visible_range, page_count, Pagination};
pub use resolver::{HttpMetadataResolver, MetadataResolver, MockResolver, ResolutionError};
pub use session::{GalleryCommand, GallerySession, SessionHandle};
pub use types::*;
pub use unit::{ResolutionState, ResolutionUnit};
pub use working_set::{ItemEntry, WorkingSet};
