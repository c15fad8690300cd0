//! Input and display glue
//!
//! Maps keyboard, media-key and UI signals onto controller operations, and
//! builds the "now playing" view the UI renders from.

use crate::resource::AudioResource;
use crate::transport::TransportController;
use serde::{Deserialize, Serialize};
use soundwave_core::Track;
use tracing::debug;

/// Keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    /// Any other key; never handled
    Other,
}

/// Where keyboard focus is when a key arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Focus is on the page or player, keys are shortcuts
    #[default]
    Player,
    /// The user is typing; keys belong to the text field
    TextInput,
}

/// Hardware / OS media keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKey {
    Play,
    Pause,
    Toggle,
    Next,
    Previous,
}

/// An input the control surface can dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSignal {
    /// Keyboard shortcut
    Key { key: Key, focus: Focus },
    /// Media key
    Media(MediaKey),
    /// Seek slider dragged to a position (seconds)
    SeekSlider(f64),
    /// Track picked from the queue list
    SelectTrack(usize),
    /// Volume slider (0.0 - 1.0)
    Volume(f32),
    /// Mute button
    ToggleMute,
}

/// Maps input signals onto a transport controller
#[derive(Debug, Clone)]
pub struct ControlSurface {
    /// Seconds skipped by the arrow keys
    pub seek_step: f64,
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self { seek_step: 5.0 }
    }
}

impl ControlSurface {
    pub fn new(seek_step: f64) -> Self {
        Self { seek_step }
    }

    /// Apply `signal` to `controller`
    ///
    /// Returns whether the signal was consumed. Keys typed into a text field
    /// and keys with no binding are not.
    pub fn dispatch<R: AudioResource>(
        &self,
        controller: &mut TransportController<R>,
        signal: ControlSignal,
    ) -> bool {
        match signal {
            ControlSignal::Key { focus: Focus::TextInput, .. } => false,
            ControlSignal::Key { key, .. } => match key {
                Key::Space => {
                    controller.toggle_play();
                    true
                }
                // Seeking with nothing loaded still swallows the key
                Key::ArrowLeft => {
                    let _ = controller.seek_by(-self.seek_step);
                    true
                }
                Key::ArrowRight => {
                    let _ = controller.seek_by(self.seek_step);
                    true
                }
                Key::Other => false,
            },
            ControlSignal::Media(media) => {
                debug!(key = ?media, "Media key");
                match media {
                    MediaKey::Play => controller.play(),
                    MediaKey::Pause => controller.pause(),
                    MediaKey::Toggle => controller.toggle_play(),
                    MediaKey::Next => {
                        controller.play_next();
                    }
                    MediaKey::Previous => {
                        controller.play_prev();
                    }
                }
                true
            }
            ControlSignal::SeekSlider(seconds) => controller.seek_to(seconds).is_ok(),
            ControlSignal::SelectTrack(index) => controller.play_at(index).is_ok(),
            ControlSignal::Volume(level) => {
                controller.set_volume(level);
                true
            }
            ControlSignal::ToggleMute => {
                controller.toggle_mute();
                true
            }
        }
    }
}

/// What the UI shows for the current track
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub track: Track,
    pub index: usize,
    pub queue_len: usize,
    pub is_playing: bool,
    /// Position in seconds
    pub current_time: f64,
    /// Duration in seconds, 0 when unknown
    pub duration: f64,
}

impl NowPlaying {
    /// View of the controller's current track, `None` with an empty queue
    pub fn from_controller<R: AudioResource>(controller: &TransportController<R>) -> Option<Self> {
        let state = controller.state();
        let track = state.current_track()?.clone();

        Some(Self {
            track,
            index: state.current_index,
            queue_len: state.queue.len(),
            is_playing: state.is_playing,
            current_time: controller.get_current_time(),
            duration: controller.get_duration(),
        })
    }

    /// Fraction played, 0.0 when the duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// One-line summary, e.g. `▶ Imagine - John Lennon [0:42 / 3:03]`
    pub fn status_line(&self) -> String {
        let icon = if self.is_playing { '▶' } else { '⏸' };
        format!(
            "{icon} {} - {} [{} / {}] ({}/{})",
            self.track.title,
            self.track.artist,
            format_time(self.current_time),
            format_time(self.duration),
            self.index + 1,
            self.queue_len
        )
    }
}

/// Render seconds as `m:ss`
///
/// Negative, NaN and infinite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
