//! Soundwave Catalog Client
//!
//! Searches an external track catalog and turns its records into playable
//! [`Track`](soundwave_core::Track)s.
//!
//! # Features
//!
//! - **Search**: one `GET` per cache miss, music tracks only, caller-chosen result cap
//! - **Filtering**: records without a preview stream, title or artist never leave this crate
//! - **Ranking**: title matches first, then artist matches, then the rest
//! - **Caching**: results cached per normalized query with a time-to-live
//! - **Supersede-able search**: [`SearchSlot`] debounces input and cancels the
//!   previous in-flight request when a new query arrives
//!
//! # Example
//!
//! ```ignore
//! use soundwave_catalog::{CatalogClient, CatalogConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::new("https://itunes.apple.com"))?;
//!
//!     let tracks = client.search("imagine").await?;
//!     for track in &tracks {
//!         println!("{} - {}", track.artist, track.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod artwork;
mod cache;
mod client;
mod error;
pub mod ranking;
mod slot;
mod types;

// Re-export main types
pub use cache::{Clock, SystemClock};
pub use client::{normalize_query, CatalogClient};
pub use error::{CatalogError, Result};
pub use slot::{SearchSlot, SearchSlotConfig, SearchStatus};
pub use types::{CatalogConfig, SearchResponse, TrackRecord};

pub use tokio_util::sync::CancellationToken;
