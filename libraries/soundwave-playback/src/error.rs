//! Error types for playback control

use soundwave_core::SoundwaveError;
use thiserror::Error;

/// Playback errors
///
/// None of these are produced by resource events: a failing resource is
/// reported through [`TransportEvent`](crate::TransportEvent)s and
/// [`TransportController::last_error`](crate::TransportController::last_error)
/// so the queue and index stay intact.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Audio resource refused an operation
    #[error("Audio resource error: {0}")]
    Resource(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Snapshot persistence error
    #[error("Storage error: {0}")]
    Storage(#[from] SoundwaveError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
