/// Player state types shared by the store and its persistence layer
use super::Track;
use serde::{Deserialize, Serialize};

/// The single source of truth for what the player is doing
///
/// Invariant: `current_index < queue.len()` whenever the queue is non-empty,
/// and `current_index == 0` when it is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    /// Ordered tracks available for sequential playback
    pub queue: Vec<Track>,

    /// Pointer into `queue` identifying the active track
    pub current_index: usize,

    /// Playback intent, independent of whether audio is actually audible yet
    pub is_playing: bool,

    /// Last known position of the current track, in seconds
    pub current_time_seconds: f64,
}

impl PlayerState {
    /// Build a state from a queue, clamping `start_index` into range
    ///
    /// An empty queue always yields index 0 and a paused intent, whatever
    /// `is_playing` says.
    pub fn with_queue(queue: Vec<Track>, start_index: usize, is_playing: bool) -> Self {
        let current_index = clamp_index(start_index, queue.len());
        let is_playing = is_playing && !queue.is_empty();

        Self {
            queue,
            current_index,
            is_playing,
            current_time_seconds: 0.0,
        }
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.queue.get(self.current_index)
    }

    /// Whether the queue holds no tracks
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether a track follows the current one
    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.queue.len()
    }

    /// Whether a track precedes the current one
    pub fn has_previous(&self) -> bool {
        self.current_index > 0 && !self.queue.is_empty()
    }
}

/// Persisted form of [`PlayerState`]
///
/// Identical to the in-memory state except that the elapsed time is stored as
/// whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Serialized queue
    pub queue: Vec<Track>,

    /// Current index
    pub current_index: usize,

    /// Playback intent
    pub is_playing: bool,

    /// Elapsed time, truncated to whole seconds
    pub current_time_seconds: u64,
}

impl PlayerSnapshot {
    /// Capture a state for persistence
    pub fn from_state(state: &PlayerState) -> Self {
        let seconds = if state.current_time_seconds.is_finite() && state.current_time_seconds > 0.0
        {
            state.current_time_seconds.trunc() as u64
        } else {
            0
        };

        Self {
            queue: state.queue.clone(),
            current_index: state.current_index,
            is_playing: state.is_playing,
            current_time_seconds: seconds,
        }
    }

    /// Rehydrate a state, re-establishing the index invariant
    ///
    /// A snapshot written by an older build (or edited by hand) may carry an
    /// index past the end of the queue; it is clamped rather than rejected.
    pub fn into_state(self) -> PlayerState {
        let mut state = PlayerState::with_queue(self.queue, self.current_index, self.is_playing);
        if !state.is_empty() {
            state.current_time_seconds = self.current_time_seconds as f64;
        }
        state
    }
}

/// Clamp an index into `[0, len - 1]`, or 0 for an empty sequence
pub(crate) fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}
