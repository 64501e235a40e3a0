//! The local collection cache behind the mutation controller. One entry
//! per collection; every write goes through the controller's three-phase
//! protocol, nothing else touches the entries.

use std::sync::Mutex;

use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

use crate::models::{ItemType, TripItem};

struct CollectionState {
    /// `None` means never loaded or invalidated; the next read refetches.
    value: Option<Vec<TripItem>>,
    /// Bumped whenever the entry must not be overwritten by an in-flight
    /// refetch: on mutation begin and on invalidation. A refetch only
    /// installs its result if the epoch it started under is still current.
    epoch: u64,
}

struct CollectionCache {
    state: Mutex<CollectionState>,
    /// Serializes mutation lifecycles against this collection, so a
    /// failing mutation's rollback can never discard another mutation's
    /// still-pending speculative state.
    mutation: AsyncMutex<()>,
}

impl CollectionCache {
    fn new() -> Self {
        CollectionCache {
            state: Mutex::new(CollectionState {
                value: None,
                epoch: 0,
            }),
            mutation: AsyncMutex::new(()),
        }
    }
}

/// Pre-mutation snapshot handed back to [`TripStore::restore`] on failure.
pub struct Snapshot {
    kind: ItemType,
    value: Option<Vec<TripItem>>,
}

pub struct TripStore {
    collections: [CollectionCache; 4],
}

impl TripStore {
    pub fn new() -> Self {
        TripStore {
            collections: std::array::from_fn(|_| CollectionCache::new()),
        }
    }

    fn entry(&self, kind: ItemType) -> &CollectionCache {
        &self.collections[kind.index()]
    }

    pub fn cached(&self, kind: ItemType) -> Option<Vec<TripItem>> {
        self.entry(kind).state.lock().unwrap().value.clone()
    }

    /// Epoch under which a refetch starts; pass it back to
    /// [`TripStore::complete_refetch`].
    pub fn refetch_epoch(&self, kind: ItemType) -> u64 {
        self.entry(kind).state.lock().unwrap().epoch
    }

    /// Installs a refetch result unless the entry moved on in the
    /// meantime (a mutation began or the entry was invalidated again).
    /// Returns whether the result was installed.
    pub fn complete_refetch(&self, kind: ItemType, epoch: u64, value: Vec<TripItem>) -> bool {
        let mut state = self.entry(kind).state.lock().unwrap();
        if state.epoch != epoch {
            return false;
        }
        state.value = Some(value);
        true
    }

    /// Begin phase: cancel in-flight refetches (epoch bump), snapshot,
    /// then apply the speculative effect. Readers see the new value as
    /// soon as this returns.
    pub fn begin_mutation(
        &self,
        kind: ItemType,
        apply: impl FnOnce(&mut Vec<TripItem>),
    ) -> Snapshot {
        let mut state = self.entry(kind).state.lock().unwrap();
        state.epoch += 1;

        let snapshot = Snapshot {
            kind,
            value: state.value.clone(),
        };

        if let Some(items) = state.value.as_mut() {
            apply(items);
        }

        snapshot
    }

    /// Success settle: drop the speculative value so the next read
    /// fetches authoritative data.
    pub fn invalidate(&self, kind: ItemType) {
        let mut state = self.entry(kind).state.lock().unwrap();
        state.epoch += 1;
        state.value = None;
    }

    /// Failure settle: put the pre-mutation snapshot back, discarding the
    /// speculative state entirely.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut state = self.entry(snapshot.kind).state.lock().unwrap();
        state.epoch += 1;
        state.value = snapshot.value;
    }

    pub async fn mutation_permit(&self, kind: ItemType) -> MutexGuard<'_, ()> {
        self.entry(kind).mutation.lock().await
    }
}

impl Default for TripStore {
    fn default() -> Self {
        TripStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_refetch_does_not_clobber_mutation() {
        let store = TripStore::new();
        store.complete_refetch(ItemType::Hotel, 0, Vec::new());

        // A refetch starts...
        let epoch = store.refetch_epoch(ItemType::Hotel);

        // ...then a mutation begins before it lands.
        let _snapshot = store.begin_mutation(ItemType::Hotel, |_items| {});

        assert!(!store.complete_refetch(ItemType::Hotel, epoch, Vec::new()));
    }

    #[test]
    fn refetch_installs_when_uncontended() {
        let store = TripStore::new();
        let epoch = store.refetch_epoch(ItemType::Flight);
        assert!(store.complete_refetch(ItemType::Flight, epoch, Vec::new()));
        assert_eq!(store.cached(ItemType::Flight), Some(Vec::new()));
    }

    #[test]
    fn invalidate_clears_the_entry() {
        let store = TripStore::new();
        store.complete_refetch(ItemType::Activity, 0, Vec::new());
        store.invalidate(ItemType::Activity);
        assert_eq!(store.cached(ItemType::Activity), None);
    }
}
