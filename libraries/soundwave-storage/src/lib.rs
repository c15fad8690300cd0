//! Soundwave Storage
//!
//! Durable key-value storage for the player snapshot.
//!
//! # Architecture
//!
//! - **One snapshot**: queue, current index, playback intent and elapsed time
//!   are the only persisted state; each is stored under its own key
//! - **Synchronous**: every save is committed before it returns, so the player
//!   store can persist from inside a mutation
//! - **Pluggable**: both stores implement `soundwave_core::SnapshotStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use soundwave_core::{PlayerSnapshot, SnapshotStore};
//! use soundwave_storage::RedbSnapshotStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedbSnapshotStore::open("data/player.redb")?;
//! store.save(&PlayerSnapshot::default())?;
//!
//! let restored = store.load()?;
//! assert!(restored.is_some());
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod snapshot;

pub use error::{Result, StorageError};
pub use memory::MemorySnapshotStore;
pub use snapshot::RedbSnapshotStore;
