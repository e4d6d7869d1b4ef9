//! Per-item resolution state machine
//!
//! Each item in a working set owns exactly one `ResolutionUnit`. The unit
//! moves `Pending → InFlight → Resolved | Failed` and never goes back. Only the
//! coordinator drives transitions; everyone else reads the state or waits for
//! it to settle.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::resolver::ResolutionError;
use crate::types::{ItemMetadata, ItemStatus};

/// Observable state of a resolution unit.
#[derive(Debug, Clone)]
pub enum ResolutionState {
    /// Not yet started
    Pending,
    /// Started, not yet complete
    InFlight,
    /// Metadata available (terminal)
    Resolved(Arc<ItemMetadata>),
    /// Resolution errored (terminal)
    Failed(ResolutionError),
}

impl ResolutionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ResolutionState::Pending)
    }

    /// True once the unit has reached a terminal state.
    pub fn is_settled(&self) -> bool {
        matches!(self, ResolutionState::Resolved(_) | ResolutionState::Failed(_))
    }

    pub fn metadata(&self) -> Option<&ItemMetadata> {
        match self {
            ResolutionState::Resolved(metadata) => Some(metadata),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ResolutionError> {
        match self {
            ResolutionState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn status(&self) -> ItemStatus {
        match self {
            ResolutionState::Pending => ItemStatus::Pending,
            ResolutionState::InFlight => ItemStatus::Loading,
            ResolutionState::Resolved(_) => ItemStatus::Ready,
            ResolutionState::Failed(_) => ItemStatus::Failed,
        }
    }
}

/// Deferred metadata resolution for a single item.
#[derive(Debug)]
pub struct ResolutionUnit {
    state: watch::Sender<ResolutionState>,
}

impl ResolutionUnit {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ResolutionState::Pending);
        Self { state }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResolutionState {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Claim the unit for resolution.
    ///
    /// Returns true exactly once per unit: the caller that moved it from
    /// `Pending` to `InFlight` owns the resolution.
    pub(crate) fn try_begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = ResolutionState::InFlight;
                true
            } else {
                false
            }
        })
    }

    /// Record the outcome of an in-flight resolution.
    ///
    /// Ignored unless the unit is `InFlight`.
    pub(crate) fn settle(&self, outcome: Result<ItemMetadata, ResolutionError>) {
        let settled = self.state.send_if_modified(|state| {
            if !matches!(state, ResolutionState::InFlight) {
                return false;
            }
            *state = match outcome {
                Ok(metadata) => ResolutionState::Resolved(Arc::new(metadata)),
                Err(err) => ResolutionState::Failed(err),
            };
            true
        });
        if !settled {
            debug!("Ignoring outcome for a unit that is not in flight");
        }
    }

    /// Fail an in-flight unit whose resolution ended without an outcome.
    pub(crate) fn abandon(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, ResolutionState::InFlight) {
                *state = ResolutionState::Failed(ResolutionError::Aborted);
                true
            } else {
                false
            }
        });
    }

    /// Wait until the unit leaves `InFlight`.
    ///
    /// Returns immediately for settled units. A `Pending` unit is waited on
    /// too, so callers should only wait on units someone has claimed.
    pub async fn settled(&self) -> ResolutionState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(ResolutionState::is_settled).await {
            Ok(state) => state.clone(),
            // Sender lives in `self`, so the channel cannot close while borrowed
            Err(_) => self.state(),
        };
        state
    }
}

impl Default for ResolutionUnit {
    fn default() -> Self {
        Self::new()
    }
}
