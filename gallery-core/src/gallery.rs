//! Gallery - owner of the current list and its page position
//!
//! Holds the one in-flight "current list" as an explicit state struct:
//! the working set (if any), the pagination state, and the last user-facing
//! error. Commands mutate it; queries project it for the render layer.

use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::GalleryConfig;
use crate::coordinator::{MetadataCoordinator, PageJob, PageReady};
use crate::error::{GalleryError, Result};
use crate::ledger::{LedgerClient, LedgerError};
use crate::pagination::{self, Pagination};
use crate::resolver::MetadataResolver;
use crate::types::{ItemDescriptor, ItemView, OwnerIdentity};
use crate::working_set::WorkingSet;

/// Everything the render layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    /// Owner of the current list
    pub owner: Option<String>,
    /// Items on the current page
    pub items: Vec<ItemView>,
    pub loading: bool,
    /// A ledger query is outstanding; `items` still shows the previous list
    pub fetching: bool,
    pub current_page: usize,
    pub page_count: usize,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    /// Last fetch or input error, cleared by the next successful fetch
    pub last_error: Option<String>,
}

/// A ledger query detached from the gallery that issued it.
pub struct FetchJob {
    ledger: Arc<dyn LedgerClient>,
    owner: OwnerIdentity,
}

/// Result of a [`FetchJob`], to be installed with [`Gallery::install`].
pub struct FetchOutcome {
    owner: OwnerIdentity,
    result: std::result::Result<Vec<ItemDescriptor>, LedgerError>,
}

impl FetchJob {
    pub fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    pub async fn run(self) -> FetchOutcome {
        let result = self.ledger.list_items_owned_by(&self.owner).await;
        FetchOutcome {
            owner: self.owner,
            result,
        }
    }
}

/// Paginated viewer over the items owned by one identity.
pub struct Gallery {
    ledger: Arc<dyn LedgerClient>,
    coordinator: MetadataCoordinator,
    config: GalleryConfig,
    working_set: Option<Arc<WorkingSet>>,
    pagination: Pagination,
    generation: u64,
    fetching: bool,
    last_error: Option<String>,
}

impl Gallery {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        resolver: Arc<dyn MetadataResolver>,
        config: GalleryConfig,
    ) -> Self {
        let pagination = Pagination::new(config.page_size);
        Self {
            ledger,
            coordinator: MetadataCoordinator::new(resolver),
            config,
            working_set: None,
            pagination,
            generation: 0,
            fetching: false,
            last_error: None,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    // =========================================================================
    // List Loader
    // =========================================================================

    /// Load the items owned by `identity` and make them the current list.
    ///
    /// On success the previous list and its resolution state are dropped and
    /// the gallery is on page 1 with `loading` raised. On failure nothing
    /// changes except `last_error`.
    pub async fn load_owner_items(&mut self, identity: &str) -> Result<Arc<WorkingSet>> {
        let job = self.prepare_fetch(identity)?;
        let outcome = job.run().await;
        self.install(outcome)
    }

    /// Validate `identity` and build the ledger query for it.
    ///
    /// Raises `fetching` until the outcome is passed to [`Gallery::install`].
    pub fn prepare_fetch(&mut self, identity: &str) -> Result<FetchJob> {
        match OwnerIdentity::parse(identity) {
            Ok(owner) => {
                self.fetching = true;
                Ok(FetchJob {
                    ledger: self.ledger.clone(),
                    owner,
                })
            }
            Err(err) => {
                warn!(identity, "Rejected owner identity");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Make a completed fetch the current list, or record its failure.
    pub fn install(&mut self, outcome: FetchOutcome) -> Result<Arc<WorkingSet>> {
        self.fetching = false;
        let items = match outcome.result {
            Ok(items) => items,
            Err(err) => {
                let err = GalleryError::from(err);
                warn!(owner = %outcome.owner, ledger = self.ledger.id(), error = %err, "Fetch failed");
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        self.generation += 1;
        let set = Arc::new(WorkingSet::new(self.generation, outcome.owner, items));
        info!(
            owner = %set.owner(),
            generation = set.generation(),
            items = set.len(),
            "Loaded owner items"
        );

        self.working_set = Some(set.clone());
        self.pagination.reset(true);
        self.last_error = None;
        Ok(set)
    }

    // =========================================================================
    // Page Window Controller
    // =========================================================================

    /// Move to the next page. Returns false at the last page.
    pub fn next_page(&mut self) -> Result<bool> {
        let len = self.working_set.as_ref().ok_or(GalleryError::NoWorkingSet)?.len();
        Ok(self.pagination.go_next(len))
    }

    /// Move to the previous page. Returns false at page 1.
    pub fn previous_page(&mut self) -> Result<bool> {
        if self.working_set.is_none() {
            return Err(GalleryError::NoWorkingSet);
        }
        Ok(self.pagination.go_prev())
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn working_set(&self) -> Option<&Arc<WorkingSet>> {
        self.working_set.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.loading
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn page_count(&self) -> usize {
        let len = self.working_set.as_ref().map_or(0, |set| set.len());
        pagination::page_count(len, self.pagination.page_size)
    }

    pub fn can_go_next(&self) -> bool {
        self.working_set
            .as_ref()
            .is_some_and(|set| pagination::can_go_next(&self.pagination, set.len()))
    }

    pub fn can_go_prev(&self) -> bool {
        self.working_set.is_some() && pagination::can_go_prev(&self.pagination)
    }

    /// Index range visible on the current page.
    pub fn visible_range(&self) -> Option<Range<usize>> {
        self.working_set
            .as_ref()
            .map(|set| pagination::compute_visible_range(&self.pagination, set.len()))
    }

    // =========================================================================
    // Metadata resolution
    // =========================================================================

    /// Resolution work for the current page.
    pub fn page_job(&self) -> Option<PageJob> {
        let set = self.working_set.as_ref()?;
        let range = pagination::compute_visible_range(&self.pagination, set.len());
        Some(PageJob::new(
            self.coordinator.clone(),
            set.clone(),
            range,
            self.pagination.current_page,
        ))
    }

    /// Clear `loading` if `ready` is for the page currently shown.
    ///
    /// Returns false for stale signals (another page, or a superseded list).
    pub fn complete_page(&mut self, ready: &PageReady) -> bool {
        let current = self.working_set.as_ref().is_some_and(|set| {
            set.generation() == ready.generation && self.pagination.current_page == ready.page
        });
        if current {
            self.pagination.loading = false;
        }
        current
    }

    /// Resolve the current page and clear `loading` once it is ready.
    pub async fn ensure_current_page(&mut self) -> Option<PageReady> {
        let ready = self.page_job()?.run().await;
        self.complete_page(&ready);
        Some(ready)
    }

    // =========================================================================
    // Render projection
    // =========================================================================

    pub fn visible_items(&self) -> Vec<ItemView> {
        match (&self.working_set, self.visible_range()) {
            (Some(set), Some(range)) => set
                .slice(range)
                .iter()
                .map(|entry| entry.view(&self.config.fallback_image))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> GalleryView {
        GalleryView {
            owner: self.working_set.as_ref().map(|set| set.owner().to_string()),
            items: self.visible_items(),
            loading: self.pagination.loading,
            fetching: self.fetching,
            current_page: self.pagination.current_page,
            page_count: self.page_count(),
            can_go_prev: self.can_go_prev(),
            can_go_next: self.can_go_next(),
            last_error: self.last_error.clone(),
        }
    }
}
