//! Group Module
//!
//! A group is a named cache namespace: one LRU store, one source of truth, and
//! optionally the peers that share its key space.
//!
//! # Get path
//! 1. Reject empty keys
//! 2. Serve from the local store when present
//! 3. Otherwise load once per key across concurrent callers:
//!    ask the owning peer, and fall back to the local [`Getter`] when there is
//!    no remote owner or the peer fails. Only locally loaded values are stored.

mod getter;
mod registry;
mod stats;

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::SingleFlight;

pub use getter::{Getter, GetterFunc};
pub use registry::GroupRegistry;
pub use stats::{GroupStats, GroupStatsSnapshot};

// == Group ==
pub struct Group {
    name: String,
    main_cache: CacheStore,
    getter: Arc<dyn Getter>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: SingleFlight<ByteView>,
    stats: GroupStats,
}

impl Group {
    // == Constructor ==
    /// Creates a standalone group. Use [`GroupRegistry::new_group`] to make it
    /// reachable by name from peers.
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name: name.into(),
            main_cache: CacheStore::new(cache_bytes),
            getter,
            peers: OnceLock::new(),
            loader: SingleFlight::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Wires in the peer picker. Allowed once per group; a second call is a
    /// configuration error and leaves the first picker in place.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    // == Get ==
    /// Returns the value for `key` from the local store, the owning peer, or
    /// the source, in that order.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        GroupStats::incr(&self.stats.gets);
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key is required".to_string()));
        }

        if let Some(value) = self.main_cache.get(key) {
            GroupStats::incr(&self.stats.cache_hits);
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        GroupStats::incr(&self.stats.loads);
        self.loader
            .execute(key, || async {
                GroupStats::incr(&self.stats.loads_deduped);

                if let Some(peer) = self.peers.get().and_then(|p| p.pick_peer(key)) {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => {
                            GroupStats::incr(&self.stats.peer_loads);
                            return Ok(value);
                        }
                        Err(err) => {
                            GroupStats::incr(&self.stats.peer_errors);
                            warn!(group = %self.name, key, error = %err, "peer fetch failed, loading locally");
                        }
                    }
                }

                self.get_locally(key).await
            })
            .await
    }

    // == Get Locally ==
    /// Asks the source and stores the value on success.
    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                GroupStats::incr(&self.stats.local_load_errs);
                return Err(err);
            }
        };
        GroupStats::incr(&self.stats.local_loads);
        info!(group = %self.name, key, size = bytes.len(), "loaded from source");

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    // The peer owns the canonical copy, so remote values are not stored here.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from(bytes))
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    /// Counts a request that arrived from another node.
    pub fn record_server_request(&self) {
        GroupStats::incr(&self.stats.server_requests);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    /// Statistics of the local LRU store.
    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
