//! Peercache - A distributed read-through cache
//!
//! Nodes split the key space with a consistent hash ring, fetch keys they do
//! not own from the owning peer, and coalesce concurrent misses so a value is
//! computed at most once per node at a time.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;
pub mod singleflight;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFunc, Group, GroupRegistry};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
