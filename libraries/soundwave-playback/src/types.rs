//! Core types for the transport controller

use serde::{Deserialize, Serialize};

/// Transport state of the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// Nothing loaded, the queue is empty, or the last load failed
    #[default]
    Idle,
    /// Source set, waiting for the resource to report it can play
    Loading,
    /// Audio is playing
    Playing,
    /// Loaded and paused
    Paused,
}

/// What happens when the last track in the queue ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfQueue {
    /// Clear the playback intent
    #[default]
    Stop,
    /// Leave the intent as it was; the player sits on the last track
    Hold,
}

/// Transport controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0 - 1.0)
    pub volume: f32,

    /// End-of-queue behavior
    pub end_of_queue: EndOfQueue,

    /// Seek back to the restored position once the first track has loaded
    pub resume_position: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            end_of_queue: EndOfQueue::Stop,
            resume_position: true,
        }
    }
}
