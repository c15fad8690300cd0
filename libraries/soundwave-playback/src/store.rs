//! Player state store
//!
//! Owns the one [`PlayerState`] and is the only thing allowed to change it.
//! Every mutation runs to completion, then writes a snapshot and notifies
//! subscribers before returning. Operations that would leave the state
//! unchanged do neither.

use crate::error::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use soundwave_core::{PlayerSnapshot, PlayerState, SnapshotStore, Track};
use tracing::{debug, warn};

/// Player state store
pub struct PlayerStore {
    state: PlayerState,
    persistence: Box<dyn SnapshotStore>,
    /// Last snapshot written successfully; identical snapshots are not rewritten
    last_saved: Option<PlayerSnapshot>,
    subscribers: Vec<Sender<PlayerState>>,
}

impl PlayerStore {
    /// Create a store with an empty queue
    ///
    /// Nothing is written until the first mutation.
    pub fn new(persistence: Box<dyn SnapshotStore>) -> Self {
        Self {
            state: PlayerState::default(),
            persistence,
            last_saved: None,
            subscribers: Vec::new(),
        }
    }

    /// Create a store from the last saved snapshot
    ///
    /// A failed load is logged and the store starts empty.
    pub fn restore(persistence: Box<dyn SnapshotStore>) -> Self {
        match persistence.load() {
            Ok(snapshot) => Self::from_snapshot(persistence, snapshot),
            Err(e) => {
                warn!(error = %e, "Failed to load player snapshot, starting empty");
                Self::new(persistence)
            }
        }
    }

    /// Like [`restore`](Self::restore), but a failed load is returned
    pub fn try_restore(persistence: Box<dyn SnapshotStore>) -> Result<Self> {
        let snapshot = persistence.load()?;
        Ok(Self::from_snapshot(persistence, snapshot))
    }

    fn from_snapshot(persistence: Box<dyn SnapshotStore>, snapshot: Option<PlayerSnapshot>) -> Self {
        let mut store = Self::new(persistence);
        if let Some(snapshot) = snapshot {
            debug!(
                tracks = snapshot.queue.len(),
                index = snapshot.current_index,
                time = snapshot.current_time_seconds,
                "Restored player snapshot"
            );
            store.last_saved = Some(snapshot.clone());
            store.state = snapshot.into_state();
        }
        store
    }

    /// Current state
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_track()
    }

    /// Receive the current state now and a copy after every mutation
    pub fn subscribe(&mut self) -> Receiver<PlayerState> {
        let (tx, rx) = unbounded();
        // Cannot fail: we hold the receiver
        let _ = tx.send(self.state.clone());
        self.subscribers.push(tx);
        rx
    }

    // ===== Operations =====

    /// Replace the queue and start playing at `start_index` (clamped)
    ///
    /// An empty queue resets the index to 0 and clears the playback intent.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        let is_playing = !tracks.is_empty();
        self.state = PlayerState::with_queue(tracks, start_index, is_playing);
        debug!(
            tracks = self.state.queue.len(),
            index = self.state.current_index,
            "Queue replaced"
        );
        self.commit();
    }

    /// Jump to `index` and play
    ///
    /// Returns `false` (and changes nothing) if the index is out of range.
    pub fn play_at(&mut self, index: usize) -> bool {
        if index >= self.state.queue.len() {
            return false;
        }
        self.move_to(index)
    }

    /// Advance to the next track and play
    ///
    /// Returns `false` at the end of the queue, where nothing changes.
    pub fn play_next(&mut self) -> bool {
        if !self.state.has_next() {
            return false;
        }
        self.move_to(self.state.current_index + 1)
    }

    /// Go back one track and play
    ///
    /// Returns `false` at the start of the queue, where nothing changes.
    pub fn play_prev(&mut self) -> bool {
        if !self.state.has_previous() {
            return false;
        }
        self.move_to(self.state.current_index - 1)
    }

    /// Flip the playback intent
    pub fn toggle_play(&mut self) {
        self.state.is_playing = !self.state.is_playing;
        self.commit();
    }

    /// Set the playback intent to playing
    ///
    /// Returns `false` if already playing or the queue is empty.
    pub fn play(&mut self) -> bool {
        if self.state.is_playing || self.state.is_empty() {
            return false;
        }
        self.state.is_playing = true;
        self.commit();
        true
    }

    /// Set the playback intent to paused
    ///
    /// Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.state.is_playing = false;
        self.commit();
        true
    }

    /// Clear the playback intent after the last track ended
    pub fn stop_at_end(&mut self) {
        if self.pause() {
            debug!("Queue ended, playback stopped");
        }
    }

    /// Record the elapsed time of the current track
    ///
    /// Stored verbatim, without clamping to the track length. Negative and
    /// non-finite values are ignored.
    pub fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            return;
        }
        if self.state.current_time_seconds == seconds {
            return;
        }
        self.state.current_time_seconds = seconds;
        self.commit();
    }

    // ===== Internal =====

    fn move_to(&mut self, index: usize) -> bool {
        if index == self.state.current_index && self.state.is_playing {
            return false;
        }
        if index != self.state.current_index {
            self.state.current_index = index;
            self.state.current_time_seconds = 0.0;
        }
        self.state.is_playing = true;
        self.commit();
        true
    }

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn persist(&mut self) {
        let snapshot = PlayerSnapshot::from_state(&self.state);
        if self.last_saved.as_ref() == Some(&snapshot) {
            return;
        }

        match self.persistence.save(&snapshot) {
            Ok(()) => self.last_saved = Some(snapshot),
            Err(e) => warn!(error = %e, "Failed to persist player snapshot"),
        }
    }

    fn notify(&mut self) {
        let state = &self.state;
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }
}

impl std::fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
