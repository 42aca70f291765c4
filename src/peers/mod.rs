//! Peers Module
//!
//! Capabilities a group uses to reach other nodes, and their HTTP implementation.
//!
//! - [`PeerPicker`] chooses the node that owns a key
//! - [`PeerGetter`] fetches a value from one remote node

mod client;
mod pool;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpGetter;
pub use pool::{HttpPool, PoolOptions, DEFAULT_BASE_PATH};
pub(crate) use pool::normalize_addr;

// == Peer Getter ==
/// Fetches a value for `key` in `group` from a remote node.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}

// == Peer Picker ==
/// Locates the remote node that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when the key belongs to this node
    /// or no peers are configured.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
