//! Track type

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable track as returned by the catalog
///
/// Tracks are values: once a track has been placed in a queue it is never
/// mutated. The `id` is unique within one catalog response but is not a
/// stable identity across searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Catalog track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album (collection) title, if the catalog reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_title: Option<String>,

    /// Cover art URL (may be empty)
    #[serde(default)]
    pub artwork_url: String,

    /// Preview stream URL handed to the audio resource
    pub stream_url: String,

    /// Track length reported by the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_millis: Option<u64>,
}

impl Track {
    /// Create a track with the fields the player requires
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        stream_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album_title: None,
            artwork_url: String::new(),
            stream_url: stream_url.into(),
            duration_millis: None,
        }
    }

    /// Set the album title
    #[must_use]
    pub fn with_album(mut self, album_title: impl Into<String>) -> Self {
        self.album_title = Some(album_title.into());
        self
    }

    /// Set the artwork URL
    #[must_use]
    pub fn with_artwork(mut self, artwork_url: impl Into<String>) -> Self {
        self.artwork_url = artwork_url.into();
        self
    }

    /// Set the catalog-reported duration
    #[must_use]
    pub fn with_duration_millis(mut self, duration_millis: u64) -> Self {
        self.duration_millis = Some(duration_millis);
        self
    }

    /// Catalog-reported duration, if any
    pub fn duration(&self) -> Option<Duration> {
        self.duration_millis.map(Duration::from_millis)
    }

    /// Catalog-reported duration in seconds, if any
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_millis.map(|ms| ms as f64 / 1000.0)
    }
}
