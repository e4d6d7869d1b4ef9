//! Mock metadata resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use super::traits::*;
use crate::types::{ItemDescriptor, ItemMetadata};

/// Mock resolver for testing.
///
/// Resolves every item to an image at `https://example.com/{address}.png`
/// unless configured otherwise, and counts calls per item.
#[derive(Default)]
pub struct MockResolver {
    failures: HashMap<String, ResolutionError>,
    gates: HashMap<String, Arc<Semaphore>>,
    delay: Option<Duration>,
    call_count: AtomicU32,
    calls: Mutex<HashMap<String, u32>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail resolution of `address` with `error`.
    pub fn with_failure(mut self, address: impl Into<String>, error: ResolutionError) -> Self {
        self.failures.insert(address.into(), error);
        self
    }

    /// Hold resolution of `address` until [`release`](Self::release) is called.
    pub fn with_held(mut self, address: impl Into<String>) -> Self {
        self.gates.insert(address.into(), Arc::new(Semaphore::new(0)));
        self
    }

    /// Delay every resolution.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Let held resolutions of `address` complete.
    pub fn release(&self, address: &str) {
        if let Some(gate) = self.gates.get(address) {
            gate.add_permits(1);
        }
    }

    /// Total number of resolve calls.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of resolve calls for one item.
    pub fn calls_for(&self, address: &str) -> u32 {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Image URL the mock assigns to `address`.
    pub fn image_for(address: &str) -> String {
        format!("https://example.com/{}.png", address)
    }
}

#[async_trait]
impl MetadataResolver for MockResolver {
    async fn resolve(&self, item: &ItemDescriptor) -> Result<ItemMetadata, ResolutionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(item.address.clone())
            .or_default() += 1;

        if let Some(gate) = self.gates.get(&item.address) {
            let _permit = gate.acquire().await.map_err(|_| ResolutionError::Aborted)?;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.get(&item.address) {
            return Err(error.clone());
        }

        Ok(ItemMetadata {
            name: Some(item.name.clone()),
            image: Some(Self::image_for(&item.address)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_resolver() {
        let resolver = MockResolver::new()
            .with_failure("bad", ResolutionError::Network("boom".into()));

        let ok = resolver.resolve(&ItemDescriptor::new("good", "Good")).await.unwrap();
        assert_eq!(ok.image_url(), Some("https://example.com/good.png"));

        let err = resolver.resolve(&ItemDescriptor::new("bad", "Bad")).await;
        assert_eq!(err, Err(ResolutionError::Network("boom".into())));

        assert_eq!(resolver.call_count(), 2);
        assert_eq!(resolver.calls_for("good"), 1);
        assert_eq!(resolver.calls_for("missing"), 0);
    }

    #[tokio::test]
    async fn test_held_item_waits_for_release() {
        let resolver = Arc::new(MockResolver::new().with_held("slow"));
        let task = {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve(&ItemDescriptor::new("slow", "Slow")).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());

        resolver.release("slow");
        assert!(task.await.unwrap().is_ok());
    }
}
