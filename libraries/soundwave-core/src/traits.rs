/// Core traits for Soundwave
use crate::error::Result;
use crate::types::PlayerSnapshot;

/// Durable storage for the player snapshot
///
/// Implementations must make `save` durable before returning: the player store
/// writes a snapshot after every mutation and relies on the latest write
/// surviving a crash or restart. Both methods take `&self` so an implementation
/// can be shared; interior mutability is the implementor's concern.
pub trait SnapshotStore: Send {
    /// Load the last saved snapshot
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PlayerSnapshot>>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &PlayerSnapshot) -> Result<()>;
}
