//! Transport controller
//!
//! Binds the player store to one audio resource. The store holds intent
//! (which track, playing or not); the controller makes the resource follow
//! it and feeds resource progress back into the store.

use crate::error::{PlaybackError, Result};
use crate::events::TransportEvent;
use crate::resource::{AudioResource, ResourceEvent};
use crate::store::PlayerStore;
use crate::types::{EndOfQueue, PlaybackConfig, TransportState};
use crate::volume::Volume;
use crossbeam_channel::Receiver;
use soundwave_core::{PlayerState, Track};
use tracing::{debug, info, warn};

/// Transport controller
///
/// Owns the [`PlayerStore`] and the one [`AudioResource`]. All store
/// mutations made through the controller are followed by [`sync`](Self::sync),
/// which moves the resource through the transport state machine:
///
/// ```text
/// Idle ──set_source──▶ Loading ──CanPlay──▶ Paused ◀──pause/play──▶ Playing
///   ▲                                                                  │
///   └────────────────────── Error / end of queue ◀─────────────────────┘
/// ```
pub struct TransportController<R: AudioResource> {
    store: PlayerStore,
    resource: R,
    config: PlaybackConfig,
    volume: Volume,
    transport: TransportState,
    /// (index, track id) of the track the resource was last pointed at
    current: Option<(usize, String)>,
    /// Restored position to seek to once the restored track has metadata
    pending_resume: Option<PendingResume>,
    last_error: Option<String>,
    pending_events: Vec<TransportEvent>,
}

impl<R: AudioResource> TransportController<R> {
    /// Bind `store` to `resource`
    ///
    /// If the store was restored mid-track, the saved position is applied
    /// after the track's metadata loads (see [`PlaybackConfig::resume_position`]).
    pub fn new(store: PlayerStore, mut resource: R, config: PlaybackConfig) -> Self {
        let volume = Volume::new(config.volume);
        resource.set_volume(volume.gain());

        let restored_time = store.state().current_time_seconds;
        let pending_resume = store
            .current_track()
            .filter(|_| config.resume_position && restored_time > 0.0)
            .map(|track| PendingResume {
                track: (store.state().current_index, track.id.clone()),
                position: restored_time,
            });

        let mut controller = Self {
            store,
            resource,
            config,
            volume,
            transport: TransportState::Idle,
            current: None,
            pending_resume,
            last_error: None,
            pending_events: Vec::new(),
        };
        controller.sync();
        controller
    }

    // ===== Queue and intent =====

    /// Replace the queue and start playing at `start_index`
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.pending_resume = None;
        self.store.set_queue(tracks, start_index);
        self.sync();
    }

    /// Jump to a queue index and play
    pub fn play_at(&mut self, index: usize) -> Result<()> {
        if index >= self.store.state().queue.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        if self.store.play_at(index) {
            self.sync();
        }
        Ok(())
    }

    /// Advance to the next track; `false` at the end of the queue
    pub fn play_next(&mut self) -> bool {
        let moved = self.store.play_next();
        if moved {
            self.sync();
        }
        moved
    }

    /// Go back one track; `false` at the start of the queue
    pub fn play_prev(&mut self) -> bool {
        let moved = self.store.play_prev();
        if moved {
            self.sync();
        }
        moved
    }

    /// Flip the playback intent
    pub fn toggle_play(&mut self) {
        self.store.toggle_play();
        self.sync();
    }

    /// Set the playback intent to playing
    pub fn play(&mut self) {
        if self.store.play() {
            self.sync();
        }
    }

    /// Set the playback intent to paused
    pub fn pause(&mut self) {
        if self.store.pause() {
            self.sync();
        }
    }

    /// Silence the resource without touching the stored intent
    ///
    /// For shutdown: the persisted snapshot keeps whatever the user last
    /// chose, so a restored session picks up playing or paused as it was.
    pub fn release(&mut self) {
        self.resource.pause();
        if self.transport == TransportState::Playing {
            self.set_transport(TransportState::Paused);
        }
    }

    // ===== Seeking =====

    /// Seek to `seconds`, clamped to `[0, duration]`
    ///
    /// Writes the resource directly; the store catches up on the next time
    /// update. Returns the position actually applied.
    pub fn seek_to(&mut self, seconds: f64) -> Result<f64> {
        if self.store.current_track().is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let target = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, self.seek_limit())
        };

        // An explicit seek replaces any pending resume
        self.pending_resume = None;
        self.resource.set_current_time(target);
        debug!(requested = seconds, applied = target, "Seek");
        Ok(target)
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta: f64) -> Result<f64> {
        let position = self.resource.current_time();
        self.seek_to(position + delta)
    }

    /// Upper seek bound: the resource's duration, else the track's, else 0
    fn seek_limit(&self) -> f64 {
        known_duration(self.resource.duration())
            .or_else(|| self.store.current_track().and_then(Track::duration_secs))
            .unwrap_or(0.0)
    }

    // ===== Volume =====

    /// Set volume (0.0 - 1.0, clamped)
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Set volume as a percentage (0 - 100, clamped)
    pub fn set_volume_percent(&mut self, percent: u8) {
        self.volume.set_percent(percent);
        self.apply_volume();
    }

    /// Mute output, keeping the volume level for unmute
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_volume();
    }

    /// Unmute and restore the pre-mute level
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_volume();
    }

    /// Flip the mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    /// Volume level (0.0 - 1.0), preserved while muted
    pub fn get_volume(&self) -> f32 {
        self.volume.level()
    }

    /// Whether output is muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    fn apply_volume(&mut self) {
        self.resource.set_volume(self.volume.gain());
        self.pending_events.push(TransportEvent::VolumeChanged {
            level: self.volume.percent(),
            muted: self.volume.is_muted(),
        });
    }

    // ===== Queries =====

    /// Duration reported by the resource, 0 when unknown
    ///
    /// 0 means "not loaded yet", not "zero-length".
    pub fn get_duration(&self) -> f64 {
        known_duration(self.resource.duration()).unwrap_or(0.0)
    }

    /// Position reported by the resource
    pub fn get_current_time(&self) -> f64 {
        self.resource.current_time()
    }

    /// Player state (queue, index, intent, last recorded time)
    pub fn state(&self) -> &PlayerState {
        self.store.state()
    }

    /// Subscribe to player state changes
    pub fn subscribe(&mut self) -> Receiver<PlayerState> {
        self.store.subscribe()
    }

    /// Where the current track is in the load/play cycle
    pub fn transport_state(&self) -> TransportState {
        self.transport
    }

    /// Message of the last resource failure, cleared when a new track loads
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// The bound audio resource
    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Direct resource access for the host's event pump
    ///
    /// Changing the source or play state through this bypasses the store.
    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    /// Playback configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Resource events =====

    /// Apply something the resource reported
    pub fn handle_resource_event(&mut self, event: ResourceEvent) {
        match event {
            ResourceEvent::LoadedMetadata { duration } => {
                debug!(duration = ?duration, "Metadata loaded");
                if let Some(PendingResume { position, .. }) = self.pending_resume.take() {
                    let limit = known_duration(duration).or_else(|| {
                        self.store.current_track().and_then(Track::duration_secs)
                    });
                    let position = limit.map_or(position, |limit| position.min(limit));
                    info!(position, "Resuming restored position");
                    self.resource.set_current_time(position);
                }
            }
            ResourceEvent::CanPlay => {
                if self.transport == TransportState::Loading {
                    self.set_transport(TransportState::Paused);
                }
                if self.store.state().is_playing && self.transport != TransportState::Playing {
                    self.request_play();
                }
            }
            ResourceEvent::TimeUpdate(seconds) => {
                // Until the restored position is applied, the resource reports
                // positions from the start of the track
                if self.pending_resume.is_none() {
                    self.store.set_current_time(seconds);
                }
            }
            ResourceEvent::Ended => self.handle_ended(),
            ResourceEvent::Error(message) => {
                let track_id = self.store.current_track().map(|t| t.id.clone());
                warn!(track_id = ?track_id, error = %message, "Playback failed");
                self.last_error = Some(message.clone());
                self.pending_resume = None;
                self.set_transport(TransportState::Idle);
                self.pending_events
                    .push(TransportEvent::PlaybackFailed { track_id, message });
            }
            ResourceEvent::PlayRejected(message) => self.play_rejected(message),
        }
    }

    fn handle_ended(&mut self) {
        if self.store.play_next() {
            self.sync();
            return;
        }

        info!(policy = ?self.config.end_of_queue, "Reached end of queue");
        self.set_transport(TransportState::Idle);
        self.pending_events.push(TransportEvent::QueueEnded);
        match self.config.end_of_queue {
            EndOfQueue::Stop => self.store.stop_at_end(),
            EndOfQueue::Hold => {}
        }
    }

    // ===== State machine =====

    /// Make the resource follow the store
    ///
    /// Loads a new source only when the current track's stream URL differs
    /// from the resource's, so unrelated state changes never restart audio.
    pub fn sync(&mut self) {
        let Some(track) = self.store.current_track() else {
            self.pending_resume = None;
            if self.transport != TransportState::Idle {
                self.resource.pause();
                self.current = None;
                self.set_transport(TransportState::Idle);
            }
            return;
        };

        let index = self.store.state().current_index;
        let key = (index, track.id.clone());
        let url = track.stream_url.clone();

        if self.current.as_ref() != Some(&key) {
            info!(index, track_id = %key.1, title = %track.title, "Track changed");
            self.pending_events.push(TransportEvent::TrackChanged {
                index,
                track_id: key.1.clone(),
            });
            self.current = Some(key);
        }

        // The restored position only applies to the track it was saved on
        if self
            .pending_resume
            .as_ref()
            .is_some_and(|pending| self.current.as_ref() != Some(&pending.track))
        {
            debug!("Dropping restored position, track changed");
            self.pending_resume = None;
        }

        if self.resource.source() != Some(url.as_str()) {
            debug!(url = %url, "Loading source");
            self.last_error = None;
            self.resource.set_source(&url);
            self.set_transport(TransportState::Loading);
            return;
        }

        let is_playing = self.store.state().is_playing;
        match (self.transport, is_playing) {
            (TransportState::Loading, _)
            | (TransportState::Playing, true)
            | (TransportState::Paused | TransportState::Idle, false) => {}
            (TransportState::Paused | TransportState::Idle, true) => self.request_play(),
            (TransportState::Playing, false) => {
                self.resource.pause();
                self.set_transport(TransportState::Paused);
            }
        }
    }

    fn request_play(&mut self) {
        match self.resource.play() {
            Ok(()) => self.set_transport(TransportState::Playing),
            Err(e) => self.play_rejected(e.to_string()),
        }
    }

    /// A refused play leaves the intent alone so a later gesture can retry
    fn play_rejected(&mut self, message: String) {
        warn!(error = %message, "Play request rejected");
        if self.transport == TransportState::Playing {
            self.set_transport(TransportState::Paused);
        }
        self.pending_events
            .push(TransportEvent::PlayRejected { message });
    }

    fn set_transport(&mut self, state: TransportState) {
        if self.transport != state {
            debug!(from = ?self.transport, to = ?state, "Transport state");
            self.transport = state;
            self.pending_events
                .push(TransportEvent::StateChanged { state });
        }
    }
}

impl<R: AudioResource> std::fmt::Debug for TransportController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportController")
            .field("store", &self.store)
            .field("transport", &self.transport)
            .field("volume", &self.volume)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Saved position waiting for its track's metadata
#[derive(Debug, Clone, PartialEq)]
struct PendingResume {
    /// (index, track id) the position was saved on
    track: (usize, String),
    position: f64,
}

fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}
