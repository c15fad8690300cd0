//! Transport events
//!
//! Buffered by the controller and drained by the host after each call.
//! Emitted when:
//! - a different track becomes current
//! - the transport state changes
//! - the resource fails or refuses to play
//! - the last track in the queue ends
//! - volume or mute changes

use crate::types::TransportState;
use serde::{Deserialize, Serialize};

/// Events emitted by the transport controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportEvent {
    /// A different track is now current and its source has been set
    TrackChanged {
        /// Queue index of the new track
        index: usize,
        /// ID of the new track
        track_id: String,
    },

    /// Transport state changed
    StateChanged {
        /// The new state
        state: TransportState,
    },

    /// The resource failed to load or play the current track
    ///
    /// The controller does not retry or skip; the queue is unchanged.
    PlaybackFailed {
        /// ID of the track that failed, if one was current
        track_id: Option<String>,
        /// Resource-reported reason
        message: String,
    },

    /// A play request was refused; the playback intent is unchanged
    PlayRejected {
        /// Resource-reported reason
        message: String,
    },

    /// The last track in the queue finished
    QueueEnded,

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        muted: bool,
    },
}
