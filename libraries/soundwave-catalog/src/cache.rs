//! Time-limited search result cache

use lru::LruCache;
use soundwave_core::Track;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Source of "now" for cache expiry
///
/// Injected so expiry can be tested without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    limit: usize,
}

struct CacheEntry {
    tracks: Vec<Track>,
    fetched_at: Instant,
}

/// LRU of ranked result lists keyed by normalized query and result cap
pub(crate) struct SearchCache {
    entries: LruCache<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl SearchCache {
    pub(crate) fn new(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Fresh results for the query, evicting the entry if it has expired
    pub(crate) fn get(&mut self, query: &str, limit: usize, now: Instant) -> Option<Vec<Track>> {
        let key = CacheKey {
            query: query.to_string(),
            limit,
        };

        let fresh = match self.entries.get(&key) {
            Some(entry) => now.saturating_duration_since(entry.fetched_at) < self.ttl,
            None => return None,
        };

        if fresh {
            self.entries.get(&key).map(|entry| entry.tracks.clone())
        } else {
            self.entries.pop(&key);
            None
        }
    }

    pub(crate) fn put(&mut self, query: &str, limit: usize, tracks: Vec<Track>, now: Instant) {
        self.entries.put(
            CacheKey {
                query: query.to_string(),
                limit,
            },
            CacheEntry {
                tracks,
                fetched_at: now,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track::new(i.to_string(), format!("T{i}"), "A", "u"))
            .collect()
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = SearchCache::new(4, Duration::from_secs(60));
        let start = Instant::now();
        cache.put("love", 6, tracks(2), start);

        let hit = cache.get("love", 6, start + Duration::from_secs(59));
        assert_eq!(hit.map(|t| t.len()), Some(2));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let mut cache = SearchCache::new(4, Duration::from_secs(60));
        let start = Instant::now();
        cache.put("love", 6, tracks(2), start);

        assert!(cache.get("love", 6, start + Duration::from_secs(60)).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn limit_is_part_of_the_key() {
        let mut cache = SearchCache::new(4, Duration::from_secs(60));
        let now = Instant::now();
        cache.put("love", 6, tracks(6), now);

        assert!(cache.get("love", 25, now).is_none());
    }

    #[test]
    fn least_recently_used_is_dropped_at_capacity() {
        let mut cache = SearchCache::new(2, Duration::from_secs(60));
        let now = Instant::now();
        cache.put("a", 6, tracks(1), now);
        cache.put("b", 6, tracks(1), now);
        cache.get("a", 6, now);
        cache.put("c", 6, tracks(1), now);

        assert!(cache.get("a", 6, now).is_some());
        assert!(cache.get("b", 6, now).is_none());
        assert!(cache.get("c", 6, now).is_some());
    }

    #[test]
    fn zero_capacity_still_holds_one_entry() {
        let mut cache = SearchCache::new(0, Duration::from_secs(60));
        let now = Instant::now();
        cache.put("a", 6, tracks(1), now);
        assert!(cache.get("a", 6, now).is_some());
    }
}
