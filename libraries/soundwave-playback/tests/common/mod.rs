//! Shared helpers for playback integration tests

#![allow(dead_code)]

use soundwave_core::Track;
use soundwave_playback::{
    AudioResource, PlaybackConfig, PlaybackError, PlayerStore, Result, TransportController,
};
use soundwave_storage::MemorySnapshotStore;

/// Create a test track
pub fn create_track(id: &str, title: &str) -> Track {
    Track::new(id, title, "Test Artist", format!("https://audio.example/{id}.m4a"))
        .with_duration_millis(120_000)
}

/// Create `n` test tracks with ids "0".."n"
pub fn create_tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| create_track(&i.to_string(), &format!("Track {i}")))
        .collect()
}

/// In-memory resource that records what the controller asked of it
#[derive(Debug, Default)]
pub struct FakeResource {
    pub source: Option<String>,
    pub playing: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f32,
    pub set_source_calls: Vec<String>,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub seeks: Vec<f64>,
    /// When set, `play` fails with this message
    pub reject_play: Option<String>,
}

impl AudioResource for FakeResource {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.set_source_calls.push(url.to_string());
        self.playing = false;
        self.position = 0.0;
        self.duration = None;
    }

    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        if let Some(message) = &self.reject_play {
            return Err(PlaybackError::Resource(message.clone()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

/// Controller over a fresh in-memory store; returns the store handle too
pub fn controller() -> (TransportController<FakeResource>, MemorySnapshotStore) {
    controller_with(PlaybackConfig::default())
}

pub fn controller_with(
    config: PlaybackConfig,
) -> (TransportController<FakeResource>, MemorySnapshotStore) {
    let persistence = MemorySnapshotStore::new();
    let store = PlayerStore::new(Box::new(persistence.clone()));
    (
        TransportController::new(store, FakeResource::default(), config),
        persistence,
    )
}

/// Simulate the resource finishing a load
pub fn load_complete(controller: &mut TransportController<FakeResource>, duration: f64) {
    use soundwave_playback::ResourceEvent;

    controller.resource_mut().duration = Some(duration);
    controller.handle_resource_event(ResourceEvent::LoadedMetadata {
        duration: Some(duration),
    });
    controller.handle_resource_event(ResourceEvent::CanPlay);
}
