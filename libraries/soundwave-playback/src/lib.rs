//! Soundwave Playback
//!
//! Player state and transport control for Soundwave.
//!
//! This crate provides:
//! - [`PlayerStore`]: the one owner of the queue, current index, playback
//!   intent and elapsed time, with snapshot persistence and subscriptions
//! - [`TransportController`]: drives a single [`AudioResource`] from the store
//!   and feeds resource events back into it
//! - [`ControlSurface`]: keyboard, media-key and slider input mapping
//! - Volume control (linear, 0-100%, mute/unmute)
//!
//! # Architecture
//!
//! `soundwave-playback` is synchronous and has no audio backend:
//! - No dependency on an async runtime
//! - No dependency on a concrete audio output
//! - Persistence goes through [`SnapshotStore`](soundwave_core::SnapshotStore)
//!
//! Platform code supplies the resource and pumps its events.
//!
//! # Example
//!
//! ```rust
//! use soundwave_core::{PlayerSnapshot, SnapshotStore, Track};
//! use soundwave_playback::{
//!     AudioResource, PlaybackConfig, PlayerStore, ResourceEvent, Result, TransportController,
//! };
//!
//! // Discard snapshots
//! struct NoPersistence;
//!
//! impl SnapshotStore for NoPersistence {
//!     fn load(&self) -> soundwave_core::Result<Option<PlayerSnapshot>> {
//!         Ok(None)
//!     }
//!     fn save(&self, _: &PlayerSnapshot) -> soundwave_core::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! // Implement AudioResource for your platform
//! #[derive(Default)]
//! struct Silence {
//!     source: Option<String>,
//!     volume: f32,
//! }
//!
//! impl AudioResource for Silence {
//!     fn source(&self) -> Option<&str> { self.source.as_deref() }
//!     fn set_source(&mut self, url: &str) { self.source = Some(url.to_string()); }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _: f64) {}
//!     fn duration(&self) -> Option<f64> { Some(30.0) }
//!     fn volume(&self) -> f32 { self.volume }
//!     fn set_volume(&mut self, volume: f32) { self.volume = volume; }
//! }
//!
//! let store = PlayerStore::new(Box::new(NoPersistence));
//! let mut controller =
//!     TransportController::new(store, Silence::default(), PlaybackConfig::default());
//!
//! controller.set_queue(
//!     vec![
//!         Track::new("1", "First", "Artist", "https://audio.example/1.m4a"),
//!         Track::new("2", "Second", "Artist", "https://audio.example/2.m4a"),
//!     ],
//!     0,
//! );
//!
//! // The platform reports the track finished
//! controller.handle_resource_event(ResourceEvent::Ended);
//! assert_eq!(controller.state().current_index, 1);
//! assert!(controller.state().is_playing);
//! ```

mod controls;
mod error;
mod events;
mod resource;
mod store;
mod transport;
pub mod types;
mod volume;

pub use controls::{format_time, ControlSignal, ControlSurface, Focus, Key, MediaKey, NowPlaying};
pub use error::{PlaybackError, Result};
pub use events::TransportEvent;
pub use resource::{AudioResource, ResourceEvent};
pub use store::PlayerStore;
pub use transport::TransportController;
pub use types::{EndOfQueue, PlaybackConfig, TransportState};
pub use volume::Volume;
