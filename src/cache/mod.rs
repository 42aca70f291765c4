//! Cache Module
//!
//! Provides the byte-bounded LRU store that backs every group.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::{EvictionCallback, LruCache, ValueSize};
pub use stats::CacheStats;
pub use store::CacheStore;
