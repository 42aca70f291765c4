//! LRU Cache Module
//!
//! Byte-bounded Least Recently Used store.
//!
//! Entries live in a slab of nodes linked by index, so lookups, promotions and
//! evictions are all O(1) without any unsafe pointer juggling.

use std::collections::HashMap;
use std::fmt;

use crate::cache::ByteView;

// == Value Size ==
/// Anything that can report how many bytes it occupies in the cache.
pub trait ValueSize {
    fn size(&self) -> usize;
}

impl ValueSize for ByteView {
    fn size(&self) -> usize {
        self.len()
    }
}

impl ValueSize for String {
    fn size(&self) -> usize {
        self.len()
    }
}

impl ValueSize for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }
}

/// Called with each entry after it has been evicted.
///
/// The callback receives the key and value by reference and cannot reach the
/// cache itself: the cache is mutably borrowed for the whole call, so
/// re-entering it from the callback does not compile.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<V: ValueSize> Node<V> {
    fn size(&self) -> usize {
        self.key.len() + self.value.size()
    }
}

// == LRU Cache ==
/// A cache bounded by the total size of its keys and values.
///
/// - Head = most recently used
/// - Tail = least recently used, evicted first
///
/// A `max_bytes` of zero means no limit. A single entry bigger than
/// `max_bytes` is still accepted once everything else has been evicted.
pub struct LruCache<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    max_bytes: usize,
    n_bytes: usize,
    evictions: u64,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: ValueSize> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_bytes` of keys and values.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            max_bytes,
            n_bytes: 0,
            evictions: 0,
            on_evicted: None,
        }
    }

    /// Creates a cache that reports every eviction to `on_evicted`.
    pub fn with_eviction_callback(max_bytes: usize, on_evicted: EvictionCallback<V>) -> Self {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(on_evicted);
        cache
    }

    // == Get ==
    /// Looks up a key and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Add ==
    /// Inserts or replaces a value and marks it as most recently used.
    ///
    /// Least recently used entries are evicted until the new total fits.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            // Take the entry out of the list while making room so the eviction
            // loop can never pick the entry being updated.
            self.unlink(idx);
            let sizes = self.slots[idx].as_mut().map(|node| {
                let old_size = node.size();
                node.value = value;
                (old_size, node.size())
            });
            if let Some((old_size, new_size)) = sizes {
                self.n_bytes -= old_size;
                self.make_room(new_size);
                self.n_bytes += new_size;
            }
            self.push_front(idx);
            return;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let size = node.size();
        self.make_room(size);

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.push_front(idx);
        self.index.insert(key, idx);
        self.n_bytes += size;
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any, and returns it.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        self.n_bytes -= node.size();
        self.evictions += 1;

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the current total size of keys and values.
    pub fn bytes(&self) -> usize {
        self.n_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Returns how many entries have been evicted so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Returns keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        let mut cur = self.head;
        while let Some(idx) = cur {
            match self.slots[idx].as_ref() {
                Some(node) => {
                    out.push(node.key.clone());
                    cur = node.next;
                }
                None => break,
            }
        }
        out
    }

    fn make_room(&mut self, incoming: usize) {
        if self.max_bytes == 0 {
            return;
        }
        while self.n_bytes + incoming > self.max_bytes && self.n_bytes > 0 {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(head) = self.slots[h].as_mut() {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.index.len())
            .field("n_bytes", &self.n_bytes)
            .field("max_bytes", &self.max_bytes)
            .field("evictions", &self.evictions)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_get() {
        let mut lru = LruCache::new(0);
        lru.add("foo", "bar".to_string());
        assert_eq!(lru.max_bytes(), 0);

        assert_eq!(lru.get("foo"), Some(&"bar".to_string()));
        assert!(lru.get("foo1").is_none());
    }

    #[test]
    fn test_remove_oldest_on_overflow() {
        let mut lru = LruCache::new(11);
        lru.add("foo", "bar".to_string());
        lru.add("fex", "new".to_string());

        assert!(lru.get("foo").is_none());
        assert_eq!(lru.get("fex"), Some(&"new".to_string()));
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.bytes(), 6);
    }

    #[test]
    fn test_on_evicted_order() {
        let removed = Arc::new(Mutex::new(Vec::new()));
        let sink = removed.clone();
        let mut lru = LruCache::with_eviction_callback(
            8,
            Box::new(move |key: &str, _value: &String| {
                sink.lock().unwrap().push(key.to_string());
            }),
        );

        lru.add("k1", "11".to_string());
        lru.add("k2", "22".to_string());
        lru.add("k3", "33".to_string());
        lru.add("k4", "44".to_string());

        assert_eq!(*removed.lock().unwrap(), vec!["k1", "k2"]);
        assert_eq!(lru.evictions(), 2);
    }

    #[test]
    fn test_get_promotes_entry() {
        let mut lru = LruCache::new(12);
        lru.add("a", "111".to_string());
        lru.add("b", "222".to_string());
        lru.add("c", "333".to_string());

        // Touch "a" so that "b" becomes the oldest
        assert!(lru.get("a").is_some());
        lru.add("d", "444".to_string());

        assert!(lru.get("b").is_none());
        assert!(lru.get("a").is_some());
        assert!(lru.get("c").is_some());
        assert!(lru.get("d").is_some());
    }

    #[test]
    fn test_update_adjusts_size_and_recency() {
        let mut lru = LruCache::new(100);
        lru.add("a", "1".to_string());
        lru.add("b", "22".to_string());
        assert_eq!(lru.bytes(), 2 + 3);

        lru.add("a", "12345".to_string());
        assert_eq!(lru.bytes(), 6 + 3);
        assert_eq!(lru.len(), 2);
        assert_eq!(lru.keys(), vec!["a", "b"]);

        lru.add("a", "".to_string());
        assert_eq!(lru.bytes(), 1 + 3);
    }

    #[test]
    fn test_update_never_evicts_itself() {
        let mut lru = LruCache::new(10);
        lru.add("a", "1234".to_string());
        lru.add("b", "1234".to_string());

        // Growing "a" must push out "b", not "a"
        lru.add("a", "12345678".to_string());

        assert_eq!(lru.keys(), vec!["a"]);
        assert_eq!(lru.bytes(), 9);
    }

    #[test]
    fn test_oversized_entry_is_accepted_when_empty() {
        let mut lru = LruCache::new(4);
        lru.add("small", "x".to_string());
        lru.add("huge", "0123456789".to_string());

        assert_eq!(lru.len(), 1);
        assert!(lru.get("small").is_none());
        assert!(lru.get("huge").is_some());
    }

    #[test]
    fn test_remove_oldest_empty() {
        let mut lru: LruCache<String> = LruCache::new(10);
        assert!(lru.remove_oldest().is_none());
        assert!(lru.is_empty());
    }

    #[test]
    fn test_remove_oldest_returns_entry() {
        let mut lru = LruCache::new(0);
        lru.add("first", ByteView::from("1"));
        lru.add("second", ByteView::from("2"));

        let (key, value) = lru.remove_oldest().unwrap();
        assert_eq!(key, "first");
        assert_eq!(value.to_string(), "1");
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.bytes(), "second".len() + 1);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut lru = LruCache::new(10);
        for i in 0..100 {
            lru.add(format!("{:03}", i), "vv".to_string());
        }

        assert_eq!(lru.len(), 2);
        assert!(lru.slots.len() <= 3);
    }
}
