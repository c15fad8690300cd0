//! Types for catalog configuration and search responses.

use serde::Deserialize;
use std::time::Duration;

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog (e.g., "https://itunes.apple.com")
    pub base_url: String,
    /// Path of the search endpoint, appended to `base_url`
    pub search_path: String,
    /// Result cap for full result views
    pub default_limit: usize,
    /// Result cap for the "queue the top N" shortcut
    pub quick_pick_limit: usize,
    /// How long a cached result list stays fresh
    pub cache_ttl: Duration,
    /// Maximum number of cached queries
    pub cache_max_entries: usize,
    /// Extra attempts after a network failure
    pub max_retries: u32,
    /// Delay before the first retry, multiplied by the attempt number
    pub retry_backoff: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Storefront country code, if the catalog needs one
    pub country: Option<String>,
    /// Rewrite artwork URLs to this edge size (cosmetic)
    pub artwork_size: Option<u32>,
}

impl CatalogConfig {
    /// Create a config with defaults for everything but the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            search_path: "/search".to_string(),
            default_limit: 25,
            quick_pick_limit: 6,
            cache_ttl: Duration::from_secs(5 * 60),
            cache_max_entries: 64,
            max_retries: 2,
            retry_backoff: Duration::from_millis(250),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            country: None,
            artwork_size: None,
        }
    }

    /// Set the cache time-to-live.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the maximum number of cached queries.
    #[must_use]
    pub fn with_cache_max_entries(mut self, entries: usize) -> Self {
        self.cache_max_entries = entries;
        self
    }

    /// Set the retry policy for network failures.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    /// Set the result caps.
    #[must_use]
    pub fn with_limits(mut self, default_limit: usize, quick_pick_limit: usize) -> Self {
        self.default_limit = default_limit;
        self.quick_pick_limit = quick_pick_limit;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the storefront country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Request larger artwork.
    #[must_use]
    pub fn with_artwork_size(mut self, size: u32) -> Self {
        self.artwork_size = Some(size);
        self
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Search response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<TrackRecord>,
}

/// One search result as the catalog sends it.
///
/// Every field is optional here: incomplete records are filtered out after
/// decoding instead of failing the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    #[serde(default)]
    pub track_id: Option<u64>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default, rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub track_time_millis: Option<u64>,
}
