//! Cache Statistics Module
//!
//! Snapshot of a store's size and hit counters.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time statistics for one LRU store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total size of keys and values currently held
    pub bytes: usize,
    /// Number of live entries
    pub items: usize,
    /// Number of lookups
    pub gets: u64,
    /// Number of lookups that found a value
    pub hits: u64,
    /// Number of entries evicted to make room
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }

    /// Lookups that did not find a value.
    pub fn misses(&self) -> u64 {
        self.gets - self.hits
    }
}
