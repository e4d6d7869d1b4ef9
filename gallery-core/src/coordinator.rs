//! Metadata Resolution Coordinator
//!
//! For a visible range of a working set, starts resolution of every item that
//! is still `Pending` and waits until every item in the range has settled.
//!
//! ## Guarantees
//!
//! - Each item is resolved at most once per working set: only the caller
//!   that claims a unit (`Pending → InFlight`) spawns its resolution.
//! - Resolutions run as detached tokio tasks. Dropping the wait (navigating
//!   away) does not cancel them; they settle their unit whenever they finish.
//! - The wait is a join over the whole range, including items claimed by an
//!   earlier call that are still in flight, so a revisit never reports a page
//!   ready early.
//! - A failed item settles as `Failed` and never aborts its siblings.
//!
//! ```text
//! ensure_page_resolved(set, 2..4)
//!    │
//!    ├─ item 2: Pending  → claim → spawn resolve ─┐
//!    ├─ item 3: InFlight → (claimed earlier) ─────┤
//!    │                                            ▼
//!    └──────────────── join: all settled ──► PageReady
//! ```

use futures::future::join_all;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::GalleryError;
use crate::resolver::MetadataResolver;
use crate::unit::ResolutionState;
use crate::working_set::{ItemEntry, WorkingSet};

/// Completion signal for one page's metadata.
#[derive(Debug)]
pub struct PageReady {
    /// Working set generation the page belongs to
    pub generation: u64,
    /// 1-based page number
    pub page: usize,
    /// Index range that was waited on
    pub range: Range<usize>,
    /// Resolutions started by this call
    pub started: usize,
    /// Items in range with metadata available
    pub resolved: usize,
    /// Items in range whose resolution failed
    pub failures: Vec<GalleryError>,
}

impl PageReady {
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Starts and joins per-item metadata resolution.
#[derive(Clone)]
pub struct MetadataCoordinator {
    resolver: Arc<dyn MetadataResolver>,
}

impl MetadataCoordinator {
    pub fn new(resolver: Arc<dyn MetadataResolver>) -> Self {
        Self { resolver }
    }

    /// Claim and start resolution for every `Pending` item in `range`.
    ///
    /// Returns the number of resolutions started. Must be called from within
    /// a tokio runtime.
    pub fn start_pending(&self, set: &WorkingSet, range: Range<usize>) -> usize {
        let mut started = 0;
        for entry in set.slice(range) {
            if entry.unit.try_begin() {
                self.spawn_resolution(entry.clone());
                started += 1;
            } else {
                debug!(address = %entry.descriptor.address, "Skipping item, already claimed");
            }
        }
        started
    }

    /// Resolve the unresolved items of `range` and wait for the whole range.
    pub async fn ensure_page_resolved(
        &self,
        set: &WorkingSet,
        range: Range<usize>,
        page: usize,
    ) -> PageReady {
        let started = self.start_pending(set, range.clone());
        let entries = set.slice(range.clone());

        let states = join_all(entries.iter().map(|entry| entry.unit.settled())).await;

        let mut resolved = 0;
        let mut failures = Vec::new();
        for (entry, state) in entries.iter().zip(states) {
            match state {
                ResolutionState::Resolved(_) => resolved += 1,
                ResolutionState::Failed(cause) => failures.push(GalleryError::ResolutionFailed {
                    item_id: entry.descriptor.address.clone(),
                    cause,
                }),
                ResolutionState::Pending | ResolutionState::InFlight => {}
            }
        }

        info!(
            generation = set.generation(),
            page,
            started,
            resolved,
            failed = failures.len(),
            "Page ready"
        );

        PageReady {
            generation: set.generation(),
            page,
            range,
            started,
            resolved,
            failures,
        }
    }

    fn spawn_resolution(&self, entry: Arc<ItemEntry>) {
        let resolver = self.resolver.clone();
        let guard = AbandonOnDrop(entry.clone());
        tokio::spawn(async move {
            let _guard = guard;
            let outcome = resolver.resolve(&entry.descriptor).await;
            match &outcome {
                Ok(_) => debug!(address = %entry.descriptor.address, "Metadata resolved"),
                Err(e) => warn!(address = %entry.descriptor.address, error = %e, "Metadata resolution failed"),
            }
            entry.unit.settle(outcome);
        });
    }
}

/// Settles the unit as aborted if the task ends without an outcome.
struct AbandonOnDrop(Arc<ItemEntry>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.unit.abandon();
    }
}

/// One page's resolution work, detached from the gallery that produced it.
pub struct PageJob {
    coordinator: MetadataCoordinator,
    set: Arc<WorkingSet>,
    range: Range<usize>,
    page: usize,
}

impl PageJob {
    pub(crate) fn new(
        coordinator: MetadataCoordinator,
        set: Arc<WorkingSet>,
        range: Range<usize>,
        page: usize,
    ) -> Self {
        Self {
            coordinator,
            set,
            range,
            page,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn generation(&self) -> u64 {
        self.set.generation()
    }

    pub async fn run(self) -> PageReady {
        self.coordinator
            .ensure_page_resolved(&self.set, self.range, self.page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{MockResolver, ResolutionError};
    use crate::types::{ItemDescriptor, ItemStatus, OwnerIdentity};
    use std::time::Duration;

    fn working_set(n: usize) -> WorkingSet {
        let owner = OwnerIdentity::parse("Geh5Ss5knQGym81toYGXDbH3MFU2JCMK7E4QyeBHor1b").unwrap();
        let items = (0..n)
            .map(|i| ItemDescriptor::new(format!("mint-{}", i), format!("Item {}", i)))
            .collect();
        WorkingSet::new(1, owner, items)
    }

    #[tokio::test]
    async fn test_resolves_only_visible_range() {
        let resolver = Arc::new(MockResolver::new());
        let coordinator = MetadataCoordinator::new(resolver.clone());
        let set = working_set(4);

        let ready = coordinator.ensure_page_resolved(&set, 1..3, 2).await;

        assert_eq!(ready.started, 2);
        assert_eq!(ready.resolved, 2);
        assert!(ready.is_complete_success());
        assert_eq!(resolver.calls_for("mint-0"), 0);
        assert_eq!(resolver.calls_for("mint-1"), 1);
        assert_eq!(resolver.calls_for("mint-2"), 1);
        assert_eq!(resolver.calls_for("mint-3"), 0);
        assert_eq!(set.entries()[3].state().status(), ItemStatus::Pending);
    }

    #[tokio::test]
    async fn test_second_call_is_free() {
        let resolver = Arc::new(MockResolver::new());
        let coordinator = MetadataCoordinator::new(resolver.clone());
        let set = working_set(2);

        coordinator.ensure_page_resolved(&set, 0..2, 1).await;
        let again = coordinator.ensure_page_resolved(&set, 0..2, 1).await;

        assert_eq!(again.started, 0);
        assert_eq!(again.resolved, 2);
        assert_eq!(resolver.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let resolver = Arc::new(
            MockResolver::new().with_failure("mint-0", ResolutionError::Network("timeout".into())),
        );
        let coordinator = MetadataCoordinator::new(resolver);
        let set = working_set(2);

        let ready = coordinator.ensure_page_resolved(&set, 0..2, 1).await;

        assert_eq!(ready.resolved, 1);
        assert_eq!(ready.failures.len(), 1);
        assert!(matches!(
            &ready.failures[0],
            GalleryError::ResolutionFailed { item_id, .. } if item_id == "mint-0"
        ));
        assert_eq!(set.entries()[1].state().status(), ItemStatus::Ready);
    }

    #[tokio::test]
    async fn test_waits_for_items_claimed_earlier() {
        let resolver = Arc::new(MockResolver::new().with_held("mint-0"));
        let coordinator = MetadataCoordinator::new(resolver.clone());
        let set = Arc::new(working_set(1));

        // First wait is dropped while the item is still in flight
        let first = tokio::time::timeout(
            Duration::from_millis(20),
            coordinator.ensure_page_resolved(&set, 0..1, 1),
        )
        .await;
        assert!(first.is_err());
        assert_eq!(set.entries()[0].state().status(), ItemStatus::Loading);

        let second = {
            let coordinator = coordinator.clone();
            let set = set.clone();
            tokio::spawn(async move { coordinator.ensure_page_resolved(&set, 0..1, 1).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!second.is_finished());

        resolver.release("mint-0");
        let ready = second.await.unwrap();
        assert_eq!(ready.started, 0);
        assert_eq!(ready.resolved, 1);
        assert_eq!(resolver.calls_for("mint-0"), 1);
    }

    #[tokio::test]
    async fn test_empty_range_is_ready_immediately() {
        let coordinator = MetadataCoordinator::new(Arc::new(MockResolver::new()));
        let set = working_set(0);
        let ready = coordinator.ensure_page_resolved(&set, 0..0, 1).await;
        assert_eq!(ready.started, 0);
        assert_eq!(ready.resolved, 0);
    }

    struct PanickingResolver;

    #[async_trait::async_trait]
    impl MetadataResolver for PanickingResolver {
        async fn resolve(
            &self,
            item: &ItemDescriptor,
        ) -> Result<crate::types::ItemMetadata, ResolutionError> {
            panic!("resolver blew up on {}", item.address);
        }
    }

    #[tokio::test]
    async fn test_panicking_resolver_settles_as_aborted() {
        let coordinator = MetadataCoordinator::new(Arc::new(PanickingResolver));
        let set = working_set(1);

        let ready = tokio::time::timeout(
            Duration::from_secs(5),
            coordinator.ensure_page_resolved(&set, 0..1, 1),
        )
        .await
        .expect("page join must not hang on a panicked resolution");

        assert_eq!(ready.started, 1);
        assert_eq!(ready.resolved, 0);
        assert_eq!(ready.failures.len(), 1);
        assert!(matches!(
            &ready.failures[0],
            GalleryError::ResolutionFailed { item_id, cause: ResolutionError::Aborted }
                if item_id == "mint-0"
        ));
        assert_eq!(set.entries()[0].state().status(), ItemStatus::Failed);
    }
}
