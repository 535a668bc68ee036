//! In-memory LRU cache for per-date fetch outcomes.
//!
//! Outcomes are immutable once written (the source dataset for a past
//! date does not change), so entries are never refreshed, only evicted
//! when capacity is exceeded.

use chrono::NaiveDate;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::FetchOutcome;

/// Statistics for the outcome cache.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// LRU cache: date -> fetch outcome.
pub struct OutcomeCache {
    cache: Arc<RwLock<LruCache<NaiveDate, FetchOutcome>>>,
    stats: Arc<RwLock<CacheStats>>,
    capacity: usize,
}

impl OutcomeCache {
    /// Create a cache holding up to `capacity` distinct dates.
    pub fn new(capacity: usize) -> Self {
        let cache_size = NonZeroUsize::new(capacity.max(1)).expect("capacity must be > 0");

        Self {
            cache: Arc::new(RwLock::new(LruCache::new(cache_size))),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            capacity,
        }
    }

    /// Get the cached outcome for a date, if any.
    pub async fn get(&self, date: NaiveDate) -> Option<FetchOutcome> {
        let mut cache = self.cache.write().await;

        if let Some(outcome) = cache.get(&date) {
            let mut stats = self.stats.write().await;
            stats.hits += 1;
            Some(outcome.clone())
        } else {
            let mut stats = self.stats.write().await;
            stats.misses += 1;
            None
        }
    }

    /// Insert an outcome for a date.
    pub async fn insert(&self, date: NaiveDate, outcome: FetchOutcome) {
        let mut cache = self.cache.write().await;
        cache.put(date, outcome);

        let mut stats = self.stats.write().await;
        stats.entries = cache.len();
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        let mut stats = self.stats.write().await;
        stats.entries = cache.len();
        stats.clone()
    }

    /// Cache capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}
