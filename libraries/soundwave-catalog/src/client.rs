//! Catalog search client.

use crate::cache::{Clock, SearchCache, SystemClock};
use crate::error::{CatalogError, Result};
use crate::ranking;
use crate::types::{CatalogConfig, SearchResponse};
use reqwest::Client;
use soundwave_core::Track;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Trim and lowercase a query
///
/// Two inputs that normalize to the same string are the same search.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Client for the external track catalog.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
///
/// # Example
///
/// ```ignore
/// use soundwave_catalog::{CatalogClient, CatalogConfig};
///
/// let config = CatalogConfig::new("https://itunes.apple.com");
/// let client = CatalogClient::new(config)?;
///
/// // Full result view
/// let tracks = client.search("imagine").await?;
///
/// // "Queue the top few"
/// let top = client.search_with_limit("imagine", client.config().quick_pick_limit).await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    config: Arc<CatalogConfig>,
    search_url: Url,
    cache: Arc<Mutex<SearchCache>>,
    clock: Arc<dyn Clock>,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client whose cache expiry reads time from `clock`.
    pub fn with_clock(config: CatalogConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = config.base_url.trim().trim_end_matches('/').to_string();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let path = if config.search_path.starts_with('/') {
            config.search_path.clone()
        } else {
            format!("/{}", config.search_path)
        };
        let search_url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Soundwave/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = SearchCache::new(config.cache_max_entries, config.cache_ttl);

        Ok(Self {
            http,
            config: Arc::new(CatalogConfig {
                base_url: base,
                search_path: path,
                ..config
            }),
            search_url,
            cache: Arc::new(Mutex::new(cache)),
            clock,
        })
    }

    /// The effective configuration (URL normalized).
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Search with the default result cap.
    pub async fn search(&self, query: &str) -> Result<Vec<Track>> {
        self.search_with_limit(query, self.config.default_limit).await
    }

    /// Search returning at most `limit` tracks.
    pub async fn search_with_limit(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        self.search_cancellable(query, limit, &CancellationToken::new())
            .await
    }

    /// Search that gives up with [`CatalogError::Cancelled`] once `cancel` fires.
    ///
    /// A blank query returns an empty list without touching the network.
    pub async fn search_cancellable(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Track>> {
        let normalized = normalize_query(query);
        if normalized.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let cached = self.lock_cache().get(&normalized, limit, self.clock.now());
        if let Some(tracks) = cached {
            debug!(query = %normalized, limit, results = tracks.len(), "Catalog cache hit");
            return Ok(tracks);
        }

        let response = self.fetch_with_retry(query.trim(), limit, cancel).await?;
        let received = response.results.len();

        let mut tracks = ranking::filter_playable(response.results, self.config.artwork_size);
        ranking::rank(&mut tracks, &normalized);
        tracks.truncate(limit);

        info!(
            query = %normalized,
            received,
            playable = tracks.len(),
            "Catalog search complete"
        );

        self.lock_cache()
            .put(&normalized, limit, tracks.clone(), self.clock.now());

        Ok(tracks)
    }

    async fn fetch_with_retry(
        &self,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse> {
        let mut attempt: u32 = 0;
        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CatalogError::Cancelled),
                result = self.fetch(term, limit) => result,
            };

            match result {
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * attempt;
                    warn!(
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Catalog request failed, retrying"
                    );
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(CatalogError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                other => return other,
            }
        }
    }

    async fn fetch(&self, term: &str, limit: usize) -> Result<SearchResponse> {
        let limit = limit.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("term", term),
            ("media", "music"),
            ("entity", "song"),
            ("limit", limit.as_str()),
        ];
        if let Some(country) = &self.config.country {
            params.push(("country", country.as_str()));
        }

        debug!(url = %self.search_url, term = %term, limit = %limit, "Searching catalog");

        let response = self
            .http
            .get(self.search_url.clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Provider {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Parse(format!("Failed to parse search response: {e}")))
    }

    fn lock_cache(&self) -> MutexGuard<'_, SearchCache> {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("search_url", &self.search_url.as_str())
            .finish_non_exhaustive()
    }
}
