//! Interactive playback session
//!
//! One task owns the controller. Every input source (prompt lines, the
//! progress tick, finished loads, media keys, search results) is multiplexed
//! into a single loop, so each handler runs to completion before the next.

use crate::commands::{Command, HELP};
use crate::media_keys::MediaKeys;
use crate::output::{LoadCompletion, RodioResource};
use anyhow::Result;
use soundwave_catalog::{SearchSlot, SearchStatus};
use soundwave_core::Track;
use soundwave_playback::{
    format_time, ControlSignal, ControlSurface, Focus, Key, MediaKey, NowPlaying,
    TransportController, TransportEvent,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Resource progress poll interval
const TICK: Duration = Duration::from_millis(250);

pub struct Session {
    controller: TransportController<RodioResource>,
    surface: ControlSurface,
    slot: SearchSlot,
    media_keys: MediaKeys,
    /// Latest ready search results, the source for `queue`
    results: Vec<Track>,
}

enum Flow {
    Continue,
    Quit,
}

impl Session {
    pub fn new(
        controller: TransportController<RodioResource>,
        surface: ControlSurface,
        slot: SearchSlot,
        media_keys: MediaKeys,
    ) -> Self {
        Self {
            controller,
            surface,
            slot,
            media_keys,
            results: Vec::new(),
        }
    }

    pub async fn run(
        mut self,
        mut loads: mpsc::UnboundedReceiver<LoadCompletion>,
        mut media: mpsc::UnboundedReceiver<MediaKey>,
    ) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut tick = tokio::time::interval(TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut search_updates = self.slot.subscribe();

        println!("Type 'help' for commands.");
        self.flush_events();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Stdin closed");
                        break;
                    };
                    if let Flow::Quit = self.handle_line(&line) {
                        break;
                    }
                }
                _ = tick.tick() => {
                    let events = self.controller.resource_mut().poll();
                    self.apply(events);
                }
                Some(completion) = loads.recv() => {
                    let events = self.controller.resource_mut().finish_load(completion);
                    self.apply(events);
                }
                Some(key) = media.recv() => {
                    self.surface.dispatch(&mut self.controller, ControlSignal::Media(key));
                }
                Ok(()) = search_updates.changed() => {
                    let status = search_updates.borrow_and_update().clone();
                    self.show_search(status);
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }

            self.flush_events();
        }

        self.slot.clear();
        self.controller.release();
        info!("Session ended");
        Ok(())
    }

    fn apply(&mut self, events: Vec<soundwave_playback::ResourceEvent>) {
        for event in events {
            self.controller.handle_resource_event(event);
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(message) => {
                println!("{message}");
                return Flow::Continue;
            }
        };

        match command {
            Command::Search(query) => self.slot.submit(&query),
            Command::Queue(start) => {
                if self.results.is_empty() {
                    println!("No results to queue, search first");
                } else if start >= self.results.len() {
                    println!("Only {} results", self.results.len());
                } else {
                    self.controller.set_queue(self.results.clone(), start);
                }
            }
            Command::Play(None) => self.controller.play(),
            Command::Play(Some(index)) => {
                if !self.dispatch(ControlSignal::SelectTrack(index)) {
                    println!("No track at position {}", index + 1);
                }
            }
            Command::Pause => self.controller.pause(),
            Command::Toggle => {
                self.dispatch(key(Key::Space));
            }
            Command::Next => {
                self.dispatch(ControlSignal::Media(MediaKey::Next));
            }
            Command::Prev => {
                self.dispatch(ControlSignal::Media(MediaKey::Previous));
            }
            Command::Seek(seconds) => {
                if !self.dispatch(ControlSignal::SeekSlider(seconds)) {
                    println!("Nothing to seek");
                }
            }
            Command::Forward => {
                self.dispatch(key(Key::ArrowRight));
            }
            Command::Rewind => {
                self.dispatch(key(Key::ArrowLeft));
            }
            Command::Volume(percent) => {
                self.dispatch(ControlSignal::Volume(f32::from(percent) / 100.0));
            }
            Command::Mute => {
                self.dispatch(ControlSignal::ToggleMute);
            }
            Command::Now => self.print_now(),
            Command::List => self.print_queue(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn dispatch(&mut self, signal: ControlSignal) -> bool {
        self.surface.dispatch(&mut self.controller, signal)
    }

    fn flush_events(&mut self) {
        let events = self.controller.drain_events();
        if events.is_empty() {
            return;
        }

        for event in &events {
            match event {
                TransportEvent::TrackChanged { .. } => self.print_now(),
                TransportEvent::PlaybackFailed { message, .. } => {
                    println!("Can't play this track: {message}");
                }
                TransportEvent::PlayRejected { message } => {
                    println!("Playback blocked: {message}");
                }
                TransportEvent::QueueEnded => println!("End of queue"),
                TransportEvent::VolumeChanged { level, muted } => {
                    if *muted {
                        println!("Muted");
                    } else {
                        println!("Volume {level}%");
                    }
                }
                TransportEvent::StateChanged { state } => debug!(state = ?state, "Transport"),
            }
        }

        let now = NowPlaying::from_controller(&self.controller);
        self.media_keys.publish(now.as_ref());
    }

    fn show_search(&mut self, status: SearchStatus) {
        match status {
            SearchStatus::Idle => {}
            SearchStatus::Pending { query } => println!("Searching for \"{query}\"..."),
            SearchStatus::Ready { query, tracks } => {
                if tracks.is_empty() {
                    println!("No playable results for \"{query}\"");
                } else {
                    print_tracks(&tracks);
                    println!("'queue' to play these, 'queue <n>' to start at result n");
                }
                self.results = tracks;
            }
            SearchStatus::Failed {
                query,
                message,
                retryable,
            } => {
                println!("Search for \"{query}\" failed: {message}");
                if retryable {
                    println!("Can't search right now, try again in a moment");
                }
            }
        }
    }

    fn print_now(&self) {
        match NowPlaying::from_controller(&self.controller) {
            Some(now) => println!("{}", now.status_line()),
            None => println!("Nothing queued"),
        }
        if let Some(error) = self.controller.last_error() {
            println!("  last error: {error}");
        }
    }

    fn print_queue(&self) {
        let state = self.controller.state();
        if state.queue.is_empty() {
            println!("Queue is empty");
            return;
        }
        for (i, track) in state.queue.iter().enumerate() {
            let marker = if i == state.current_index { '>' } else { ' ' };
            println!("{marker} {:>2}. {} - {}", i + 1, track.title, track.artist);
        }
    }
}

fn key(key: Key) -> ControlSignal {
    ControlSignal::Key {
        key,
        focus: Focus::Player,
    }
}

/// Numbered result list
pub fn print_tracks(tracks: &[Track]) {
    for (i, track) in tracks.iter().enumerate() {
        let duration = track
            .duration_secs()
            .map(format_time)
            .unwrap_or_else(|| "-:--".to_string());
        match &track.album_title {
            Some(album) => println!(
                "{:>2}. {} - {} ({album}) [{duration}]",
                i + 1,
                track.title,
                track.artist
            ),
            None => println!("{:>2}. {} - {} [{duration}]", i + 1, track.title, track.artist),
        }
    }
}
