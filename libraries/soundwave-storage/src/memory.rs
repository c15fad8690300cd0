//! In-memory snapshot store

use soundwave_core::{PlayerSnapshot, SnapshotStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Snapshot store that keeps the latest snapshot in memory
///
/// Used for ephemeral sessions and tests. Clones share the same slot, so a
/// test can hand one clone to the player and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    slot: Arc<Mutex<Option<PlayerSnapshot>>>,
    saves: Arc<AtomicUsize>,
}

impl MemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a snapshot
    pub fn with_snapshot(snapshot: PlayerSnapshot) -> Self {
        let store = Self::default();
        *store.lock() = Some(snapshot);
        store
    }

    /// Latest saved snapshot
    pub fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.lock().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PlayerSnapshot>> {
        // A poisoned slot still holds a whole snapshot
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> soundwave_core::Result<Option<PlayerSnapshot>> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &PlayerSnapshot) -> soundwave_core::Result<()> {
        *self.lock() = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let store = MemorySnapshotStore::new();
        let observer = store.clone();

        store
            .save(&PlayerSnapshot {
                current_index: 3,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(observer.snapshot().unwrap().current_index, 3);
        assert_eq!(observer.save_count(), 1);
    }

    #[test]
    fn empty_store_loads_none() {
        assert!(MemorySnapshotStore::new().load().unwrap().is_none());
    }
}
