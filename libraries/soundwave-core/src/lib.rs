//! Soundwave Core
//!
//! Platform-agnostic domain types, traits, and error handling shared by every
//! Soundwave crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlayerState`, `PlayerSnapshot`
//! - **Core Traits**: `SnapshotStore` (durable player state)
//! - **Error Handling**: Unified `SoundwaveError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use soundwave_core::{PlayerSnapshot, PlayerState, Track};
//!
//! let track = Track::new("1", "Imagine", "John Lennon", "https://audio.example/1.m4a");
//! let state = PlayerState::with_queue(vec![track], 0, true);
//!
//! let snapshot = PlayerSnapshot::from_state(&state);
//! assert_eq!(snapshot.into_state(), state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, SoundwaveError};
pub use traits::SnapshotStore;
pub use types::{PlayerSnapshot, PlayerState, Track};
