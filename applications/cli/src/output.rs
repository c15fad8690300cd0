//! Audio output through rodio
//!
//! Preview streams are short, so a track is fetched whole with reqwest,
//! decoded from memory and played through a rodio [`Sink`]. Fetches run on
//! the runtime and report back through a channel; the session loop hands each
//! completion to [`RodioResource::finish_load`] and polls progress with
//! [`RodioResource::poll`].

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use soundwave_playback::{AudioResource, PlaybackError, ResourceEvent};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type AudioBytes = Arc<[u8]>;

/// A finished (or failed) fetch for one `set_source` call
#[derive(Debug)]
pub struct LoadCompletion {
    generation: u64,
    url: String,
    result: std::result::Result<Vec<u8>, String>,
}

/// [`AudioResource`] backed by the default output device
pub struct RodioResource {
    // Must outlive every sink
    stream: OutputStream,
    http: reqwest::Client,
    loads: mpsc::UnboundedSender<LoadCompletion>,
    fetch: Option<JoinHandle<()>>,
    /// Bumped on every `set_source`; completions from older loads are dropped
    generation: u64,
    source: Option<String>,
    sink: Option<Sink>,
    bytes: Option<AudioBytes>,
    duration: Option<f64>,
    volume: f32,
    ended: bool,
}

impl RodioResource {
    /// Open the default output device
    ///
    /// Load completions arrive on the returned receiver.
    pub fn open(http: reqwest::Client) -> Result<(Self, mpsc::UnboundedReceiver<LoadCompletion>)> {
        let stream = OutputStreamBuilder::open_default_stream()
            .context("Failed to open audio output")?;
        let (loads, completions) = mpsc::unbounded_channel();

        Ok((
            Self {
                stream,
                http,
                loads,
                fetch: None,
                generation: 0,
                source: None,
                sink: None,
                bytes: None,
                duration: None,
                volume: 1.0,
                ended: false,
            },
            completions,
        ))
    }

    /// Install a fetched track, returning the events it produces
    pub fn finish_load(&mut self, completion: LoadCompletion) -> Vec<ResourceEvent> {
        if completion.generation != self.generation {
            debug!(url = %completion.url, "Dropping stale load");
            return Vec::new();
        }
        self.fetch = None;

        let bytes: AudioBytes = match completion.result {
            Ok(bytes) => bytes.into(),
            Err(message) => return vec![ResourceEvent::Error(message)],
        };

        let decoder = match decode(&bytes) {
            Ok(decoder) => decoder,
            Err(message) => return vec![ResourceEvent::Error(message)],
        };
        let duration = decoder.total_duration().map(|d| d.as_secs_f64());

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(decoder);

        debug!(url = %completion.url, duration = ?duration, "Track loaded");
        self.sink = Some(sink);
        self.bytes = Some(bytes);
        self.duration = duration;
        self.ended = false;

        vec![ResourceEvent::LoadedMetadata { duration }, ResourceEvent::CanPlay]
    }

    /// Progress since the last poll
    pub fn poll(&mut self) -> Vec<ResourceEvent> {
        let Some(sink) = &self.sink else {
            return Vec::new();
        };
        if self.ended || sink.is_paused() {
            return Vec::new();
        }
        if sink.empty() {
            self.ended = true;
            return vec![ResourceEvent::Ended];
        }
        vec![ResourceEvent::TimeUpdate(sink.get_pos().as_secs_f64())]
    }

    fn spawn_fetch(&mut self, url: String) {
        let http = self.http.clone();
        let loads = self.loads.clone();
        let generation = self.generation;

        self.fetch = Some(tokio::spawn(async move {
            let result = fetch(&http, &url).await;
            // Receiver gone means the session is shutting down
            let _ = loads.send(LoadCompletion {
                generation,
                url,
                result,
            });
        }));
    }

    fn stop(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.bytes = None;
        self.duration = None;
        self.ended = false;
    }
}

impl AudioResource for RodioResource {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, url: &str) {
        self.stop();
        self.generation += 1;
        self.source = Some(url.to_string());
        self.spawn_fetch(url.to_string());
    }

    fn play(&mut self) -> soundwave_playback::Result<()> {
        let (Some(sink), Some(bytes)) = (&self.sink, &self.bytes) else {
            return Err(PlaybackError::Resource("nothing loaded".into()));
        };

        // Playing again after the end starts over
        if self.ended || sink.empty() {
            let decoder = decode(bytes).map_err(PlaybackError::Resource)?;
            sink.append(decoder);
            self.ended = false;
        }

        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn current_time(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |sink| sink.get_pos().as_secs_f64())
    }

    fn set_current_time(&mut self, seconds: f64) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Err(e) = sink.try_seek(Duration::from_secs_f64(seconds.max(0.0))) {
            warn!(error = %e, position = seconds, "Seek failed");
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fetch(http: &reqwest::Client, url: &str) -> std::result::Result<Vec<u8>, String> {
    debug!(url = %url, "Fetching preview");

    let response = http
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| format!("Failed to fetch {url}: {e}"))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("Failed to read {url}: {e}"))?;

    Ok(bytes.to_vec())
}

fn decode(bytes: &AudioBytes) -> std::result::Result<Decoder<Cursor<AudioBytes>>, String> {
    Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| format!("Failed to decode audio: {e}"))
}
