//! Mock ledger for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::traits::*;
use crate::types::{ItemDescriptor, OwnerIdentity};

/// Mock ledger for testing.
///
/// Owners without registered items own nothing.
#[derive(Default)]
pub struct MockLedger {
    owners: HashMap<String, Vec<ItemDescriptor>>,
    failure: Mutex<Option<LedgerError>>,
    call_count: AtomicU32,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the items held by `owner`.
    pub fn with_owner(mut self, owner: impl Into<String>, items: Vec<ItemDescriptor>) -> Self {
        self.owners.insert(owner.into(), items);
        self
    }

    /// Register `count` items named `Item 0..count` with addresses `{prefix}-{i}`.
    pub fn with_generated(self, owner: impl Into<String>, prefix: &str, count: usize) -> Self {
        let items = (0..count)
            .map(|i| {
                ItemDescriptor::new(format!("{}-{}", prefix, i), format!("Item {}", i))
                    .with_uri(format!("https://example.com/{}-{}.json", prefix, i))
            })
            .collect();
        self.with_owner(owner, items)
    }

    /// Fail every query with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<LedgerError>) {
        *self.failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = error;
    }

    /// Get the number of queries made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn id(&self) -> &str {
        "mock-ledger"
    }

    async fn list_items_owned_by(
        &self,
        owner: &OwnerIdentity,
    ) -> Result<Vec<ItemDescriptor>, LedgerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }

        Ok(self.owners.get(owner.as_str()).cloned().unwrap_or_default())
    }
}
