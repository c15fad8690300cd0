//! OS media keys (MPRIS / SMTC / Now Playing)
//!
//! With the `media-keys` feature, key presses are forwarded to the session
//! through a channel and the current track is published back to the OS.
//! Without it, [`MediaKeys`] does nothing.

use soundwave_playback::{MediaKey, NowPlaying};
use tokio::sync::mpsc;

#[cfg(feature = "media-keys")]
pub use enabled::MediaKeys;

#[cfg(not(feature = "media-keys"))]
pub use disabled::MediaKeys;

/// Start listening for media keys
pub fn listen() -> (MediaKeys, mpsc::UnboundedReceiver<MediaKey>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MediaKeys::new(tx), rx)
}

#[cfg(feature = "media-keys")]
mod enabled {
    use super::{MediaKey, NowPlaying};
    use souvlaki::{MediaControlEvent, MediaControls, MediaMetadata, MediaPlayback, PlatformConfig};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tracing::{debug, warn};

    const DISPLAY_NAME: &str = "Soundwave";
    const DBUS_NAME: &str = "soundwave";

    pub struct MediaKeys {
        controls: Option<MediaControls>,
    }

    impl MediaKeys {
        pub(super) fn new(tx: mpsc::UnboundedSender<MediaKey>) -> Self {
            Self {
                controls: create_controls(tx),
            }
        }

        /// Publish the current track and play state
        pub fn publish(&mut self, now: Option<&NowPlaying>) {
            let Some(controls) = self.controls.as_mut() else {
                return;
            };

            let result = match now {
                Some(now) => controls
                    .set_metadata(MediaMetadata {
                        title: Some(now.track.title.as_str()),
                        artist: Some(now.track.artist.as_str()),
                        album: now.track.album_title.as_deref(),
                        cover_url: Some(now.track.artwork_url.as_str())
                            .filter(|url| !url.is_empty()),
                        duration: (now.duration > 0.0)
                            .then(|| Duration::from_secs_f64(now.duration)),
                    })
                    .and_then(|()| {
                        controls.set_playback(if now.is_playing {
                            MediaPlayback::Playing { progress: None }
                        } else {
                            MediaPlayback::Paused { progress: None }
                        })
                    }),
                None => controls
                    .set_metadata(MediaMetadata::default())
                    .and_then(|()| controls.set_playback(MediaPlayback::Stopped)),
            };

            if let Err(err) = result {
                warn!(error = ?err, "Failed to publish media state");
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn create_controls(tx: mpsc::UnboundedSender<MediaKey>) -> Option<MediaControls> {
        let mut controls = match MediaControls::new(PlatformConfig {
            display_name: DISPLAY_NAME,
            dbus_name: DBUS_NAME,
            hwnd: None,
        }) {
            Ok(controls) => controls,
            Err(err) => {
                warn!(error = ?err, "Media controls unavailable");
                return None;
            }
        };

        if let Err(err) = controls.attach(move |event| {
            if let Some(key) = map_event(&event) {
                let _ = tx.send(key);
            } else {
                debug!(event = ?event, "Ignoring media control event");
            }
        }) {
            warn!(error = ?err, "Failed to attach media controls handler");
            return None;
        }

        Some(controls)
    }

    #[cfg(target_os = "windows")]
    fn create_controls(_tx: mpsc::UnboundedSender<MediaKey>) -> Option<MediaControls> {
        // SMTC needs a window handle, and a terminal has none
        warn!("Media controls are not supported in the terminal on Windows");
        None
    }

    fn map_event(event: &MediaControlEvent) -> Option<MediaKey> {
        match event {
            MediaControlEvent::Play => Some(MediaKey::Play),
            MediaControlEvent::Pause => Some(MediaKey::Pause),
            MediaControlEvent::Toggle => Some(MediaKey::Toggle),
            MediaControlEvent::Next => Some(MediaKey::Next),
            MediaControlEvent::Previous => Some(MediaKey::Previous),
            _ => None,
        }
    }

}

#[cfg(not(feature = "media-keys"))]
mod disabled {
    use super::{MediaKey, NowPlaying};
    use tokio::sync::mpsc;

    pub struct MediaKeys {
        // Held so the receiver stays open
        _tx: mpsc::UnboundedSender<MediaKey>,
    }

    impl MediaKeys {
        pub(super) fn new(tx: mpsc::UnboundedSender<MediaKey>) -> Self {
            Self { _tx: tx }
        }

        pub fn publish(&mut self, _now: Option<&NowPlaying>) {}
    }
}
