//! Debounced, last-query-wins search
//!
//! Typing produces a stream of queries; only the newest one may publish
//! results. Each submission cancels the previous task before it starts its
//! own, so a slow response for an old query can never overwrite a newer one.

use crate::client::CatalogClient;
use crate::error::CatalogError;
use soundwave_core::Track;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What the result view should show
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    /// No active query
    #[default]
    Idle,
    /// Request in flight
    Pending { query: String },
    /// Ranked, playable results
    Ready { query: String, tracks: Vec<Track> },
    /// The search failed; `retryable` mirrors [`CatalogError::is_retryable`]
    Failed {
        query: String,
        message: String,
        retryable: bool,
    },
}

impl SearchStatus {
    /// Query the status belongs to, if any
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending { query } | Self::Ready { query, .. } | Self::Failed { query, .. } => {
                Some(query)
            }
        }
    }

    /// Results when ready
    pub fn tracks(&self) -> Option<&[Track]> {
        match self {
            Self::Ready { tracks, .. } => Some(tracks),
            _ => None,
        }
    }
}

/// Search slot tuning
#[derive(Debug, Clone)]
pub struct SearchSlotConfig {
    /// Quiet period after the last keystroke before searching
    pub debounce: Duration,
    /// Queries shorter than this (after trimming) are not sent
    pub min_query_len: usize,
    /// Result cap; `None` uses the client's default
    pub limit: Option<usize>,
}

impl Default for SearchSlotConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            limit: None,
        }
    }
}

struct ActiveSearch {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Holds at most one live search task
///
/// Must be used from within a Tokio runtime.
pub struct SearchSlot {
    client: CatalogClient,
    config: SearchSlotConfig,
    status: Arc<watch::Sender<SearchStatus>>,
    active: Option<ActiveSearch>,
}

impl SearchSlot {
    pub fn new(client: CatalogClient, config: SearchSlotConfig) -> Self {
        let (status, _) = watch::channel(SearchStatus::Idle);
        Self {
            client,
            config,
            status: Arc::new(status),
            active: None,
        }
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }

    /// Current status
    pub fn status(&self) -> SearchStatus {
        self.status.borrow().clone()
    }

    /// Start a search for `input`, superseding any previous one
    pub fn submit(&mut self, input: &str) {
        self.cancel_active();

        let query = input.trim().to_string();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let client = self.client.clone();
        let status = Arc::clone(&self.status);
        let debounce = self.config.debounce;
        let too_short = query.chars().count() < self.config.min_query_len;
        let limit = self.config.limit.unwrap_or(client.config().default_limit);

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_cancel.cancelled() => return,
                () = tokio::time::sleep(debounce) => {}
            }

            if too_short {
                publish(&status, &task_cancel, SearchStatus::Idle);
                return;
            }

            let pending = SearchStatus::Pending {
                query: query.clone(),
            };
            if !publish(&status, &task_cancel, pending) {
                return;
            }

            let result = client
                .search_cancellable(&query, limit, &task_cancel)
                .await;

            let next = match result {
                Ok(tracks) => SearchStatus::Ready {
                    query: query.clone(),
                    tracks,
                },
                Err(CatalogError::Cancelled) => return,
                Err(err) => {
                    warn!(query = %query, error = %err, "Search failed");
                    SearchStatus::Failed {
                        query: query.clone(),
                        message: err.to_string(),
                        retryable: err.is_retryable(),
                    }
                }
            };

            if !publish(&status, &task_cancel, next) {
                debug!(query = %query, "Search superseded");
            }
        });

        self.active = Some(ActiveSearch { cancel, handle });
    }

    /// Cancel any live search and reset to idle
    pub fn clear(&mut self) {
        self.cancel_active();
        self.status.send_replace(SearchStatus::Idle);
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.handle.abort();
        }
    }
}

/// Publish `next` unless `cancel` has fired
///
/// The check runs under the channel's lock, so a status written by
/// `clear()` or a newer submission is never overwritten by a superseded task.
fn publish(
    status: &watch::Sender<SearchStatus>,
    cancel: &CancellationToken,
    next: SearchStatus,
) -> bool {
    status.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        *current = next;
        true
    })
}

impl Drop for SearchSlot {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

impl std::fmt::Debug for SearchSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSlot")
            .field("config", &self.config)
            .field("status", &*self.status.borrow())
            .field("active", &self.active.is_some())
            .finish()
    }
}
