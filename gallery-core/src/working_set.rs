//! Order-stable list of items for one owner query

use std::ops::Range;
use std::sync::Arc;

use crate::types::{ItemDescriptor, ItemView, OwnerIdentity};
use crate::unit::{ResolutionState, ResolutionUnit};

/// One item of a working set: its descriptor and its resolution unit.
#[derive(Debug)]
pub struct ItemEntry {
    pub descriptor: ItemDescriptor,
    pub unit: ResolutionUnit,
}

impl ItemEntry {
    pub fn new(descriptor: ItemDescriptor) -> Self {
        Self {
            descriptor,
            unit: ResolutionUnit::new(),
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.unit.state()
    }

    /// Render projection, falling back to `fallback_image` without a resolved image.
    pub fn view(&self, fallback_image: &str) -> ItemView {
        let state = self.unit.state();
        let image = state
            .metadata()
            .and_then(|metadata| metadata.image_url())
            .unwrap_or(fallback_image)
            .to_string();

        ItemView {
            address: self.descriptor.address.clone(),
            name: self.descriptor.name.clone(),
            image_url_or_fallback: image,
            status: state.status(),
        }
    }
}

/// Items owned by one identity, in the order the ledger returned them.
///
/// Immutable once built; a new fetch replaces it wholesale.
#[derive(Debug)]
pub struct WorkingSet {
    generation: u64,
    owner: OwnerIdentity,
    entries: Vec<Arc<ItemEntry>>,
}

impl WorkingSet {
    /// Build a working set with one `Pending` unit per descriptor.
    pub fn new(generation: u64, owner: OwnerIdentity, descriptors: Vec<ItemDescriptor>) -> Self {
        Self {
            generation,
            owner,
            entries: descriptors
                .into_iter()
                .map(|descriptor| Arc::new(ItemEntry::new(descriptor)))
                .collect(),
        }
    }

    /// Load counter value identifying this set.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<ItemEntry>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Arc<ItemEntry>] {
        &self.entries
    }

    /// Entries within `range`, clamped to the set's bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Arc<ItemEntry>] {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        &self.entries[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemMetadata, ItemStatus};

    fn owner() -> OwnerIdentity {
        OwnerIdentity::parse("Geh5Ss5knQGym81toYGXDbH3MFU2JCMK7E4QyeBHor1b").unwrap()
    }

    fn descriptors(n: usize) -> Vec<ItemDescriptor> {
        (0..n)
            .map(|i| ItemDescriptor::new(format!("mint-{}", i), format!("Item {}", i)))
            .collect()
    }

    #[test]
    fn test_new_set_is_all_pending_and_ordered() {
        let set = WorkingSet::new(7, owner(), descriptors(3));
        assert_eq!(set.generation(), 7);
        assert_eq!(set.len(), 3);
        assert!(set.entries().iter().all(|e| e.unit.is_pending()));
        let names: Vec<_> = set.entries().iter().map(|e| e.descriptor.name.as_str()).collect();
        assert_eq!(names, ["Item 0", "Item 1", "Item 2"]);
    }

    #[test]
    fn test_slice_clamps_to_bounds() {
        let set = WorkingSet::new(1, owner(), descriptors(3));
        assert_eq!(set.slice(2..4).len(), 1);
        assert!(set.slice(5..6).is_empty());
        assert_eq!(set.slice(0..3).len(), 3);
    }

    #[test]
    fn test_view_uses_fallback_until_resolved() {
        let entry = ItemEntry::new(ItemDescriptor::new("mint", "Degen"));
        let view = entry.view("/fallbackImage.jpg");
        assert_eq!(view.image_url_or_fallback, "/fallbackImage.jpg");
        assert_eq!(view.status, ItemStatus::Pending);

        entry.unit.try_begin();
        entry
            .unit
            .settle(Ok(ItemMetadata::with_image("https://example.com/degen.png")));
        let view = entry.view("/fallbackImage.jpg");
        assert_eq!(view.image_url_or_fallback, "https://example.com/degen.png");
        assert_eq!(view.name, "Degen");
        assert_eq!(view.status, ItemStatus::Ready);
    }
}
