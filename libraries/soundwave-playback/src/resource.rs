//! Audio resource abstraction
//!
//! The transport controller drives exactly one resource: something that can
//! load a stream URL, play and pause it, seek, and report progress. Loading
//! and playback progress are asynchronous on every real backend, so the
//! resource reports them back as [`ResourceEvent`]s which the host feeds to
//! [`TransportController::handle_resource_event`](crate::TransportController::handle_resource_event).

use crate::error::Result;

/// Platform audio output
///
/// Not required to be `Send`: output streams are often tied to the thread
/// that opened them, and the controller that owns the resource is meant to
/// live on a single task.
pub trait AudioResource {
    /// Stream URL currently loaded, if any
    fn source(&self) -> Option<&str>;

    /// Start loading `url`, replacing the current source
    ///
    /// Completion is reported with [`ResourceEvent::LoadedMetadata`] and
    /// [`ResourceEvent::CanPlay`], failure with [`ResourceEvent::Error`].
    fn set_source(&mut self, url: &str);

    /// Request playback
    ///
    /// An immediate refusal is returned as an error; a refusal that arrives
    /// later is reported with [`ResourceEvent::PlayRejected`].
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Seek to `seconds`
    fn set_current_time(&mut self, seconds: f64);

    /// Duration in seconds, `None` until metadata has loaded
    fn duration(&self) -> Option<f64>;

    /// Output volume (0.0 - 1.0)
    fn volume(&self) -> f32;

    /// Set output volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);
}

impl<R: AudioResource + ?Sized> AudioResource for Box<R> {
    fn source(&self) -> Option<&str> {
        (**self).source()
    }

    fn set_source(&mut self, url: &str) {
        (**self).set_source(url);
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        (**self).set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn volume(&self) -> f32 {
        (**self).volume()
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume);
    }
}

/// Something the resource reports back
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Stream metadata is available
    LoadedMetadata {
        /// Duration in seconds, if the stream reports one
        duration: Option<f64>,
    },

    /// Enough data is buffered to start playing
    CanPlay,

    /// Playback progressed to this position (seconds)
    TimeUpdate(f64),

    /// The track played to the end
    Ended,

    /// Loading or decoding failed
    Error(String),

    /// A play request was refused after the fact
    PlayRejected(String),
}
