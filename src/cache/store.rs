//! Cache Store Module
//!
//! Thread-safe wrapper that gives a group exclusive, short-lived access to its LRU.

use parking_lot::Mutex;

use crate::cache::{ByteView, CacheStats, LruCache};

#[derive(Debug)]
struct Inner {
    lru: LruCache<ByteView>,
    gets: u64,
    hits: u64,
}

// == Cache Store ==
/// A byte-bounded LRU of [`ByteView`]s guarded by a single mutex.
///
/// Every operation holds the lock only for the O(1) list and map update.
#[derive(Debug)]
pub struct CacheStore {
    inner: Mutex<Inner>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store that holds at most `max_bytes` of keys and values.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lru: LruCache::new(max_bytes),
                gets: 0,
                hits: 0,
            }),
        }
    }

    // == Get ==
    /// Returns the cached view for `key`, promoting it to most recently used.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        inner.gets += 1;
        let value = inner.lru.get(key).cloned();
        if value.is_some() {
            inner.hits += 1;
        }
        value
    }

    // == Add ==
    /// Inserts or replaces the view for `key`.
    pub fn add(&self, key: &str, value: ByteView) {
        self.inner.lock().lru.add(key, value);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            bytes: inner.lru.bytes(),
            items: inner.lru.len(),
            gets: inner.gets,
            hits: inner.hits,
            evictions: inner.lru.evictions(),
        }
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
