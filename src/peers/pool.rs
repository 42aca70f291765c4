//! HTTP peer pool
//!
//! Holds the hash ring over every node's base URL and one client per peer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::peers::{HttpGetter, PeerGetter, PeerPicker};
use crate::ring::{HashRing, DEFAULT_REPLICAS};

/// Path prefix under which nodes serve each other.
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";

/// Fixed settings for a pool, chosen at construction.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Path prefix, must start and end with `/`
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Upper bound on a single peer request
    pub timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Picks peers for a group and owns the HTTP clients that reach them.
///
/// The serving side lives in [`crate::api::create_peer_router`], mounted under
/// the same base path.
#[derive(Debug)]
pub struct HttpPool {
    self_addr: String,
    options: PoolOptions,
    client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool for the node reachable at `self_addr`,
    /// e.g. `http://10.0.0.1:8001`.
    pub fn new(self_addr: impl Into<String>) -> Result<Self> {
        Self::with_options(self_addr, PoolOptions::default())
    }

    pub fn with_options(self_addr: impl Into<String>, options: PoolOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| CacheError::Internal(format!("building peer client: {}", e)))?;

        Ok(Self {
            self_addr: normalize_addr(&self_addr.into()),
            state: Mutex::new(PoolState {
                ring: HashRing::new(options.replicas),
                getters: HashMap::new(),
            }),
            options,
            client,
        })
    }

    // == Set Peers ==
    /// Replaces the peer set. The new ring and client table are swapped in
    /// together under the pool lock.
    ///
    /// `peers` should include this node's own address so that it owns its
    /// share of the key space.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|p| normalize_addr(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();

        let mut ring = HashRing::new(self.options.replicas);
        ring.add(&peers);
        let getters = peers
            .iter()
            .map(|peer| {
                let base_url = format!("{}{}", peer, self.options.base_path);
                (peer.clone(), Arc::new(HttpGetter::new(base_url, self.client.clone())))
            })
            .collect();

        *self.state.lock() = PoolState { ring, getters };
        info!(node = %self.self_addr, peers = ?peers, "peer set updated");
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    /// Returns the address that owns `key`, which may be this node.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.state.lock().ring.get(key).map(str::to_string)
    }
}

/// Canonical form of a node address, so that ring owners compare equal to
/// `self_addr` regardless of surrounding whitespace or a trailing `/`.
pub(crate) fn normalize_addr(addr: &str) -> String {
    addr.trim().trim_end_matches('/').to_string()
}

impl PeerPicker for HttpPool {
    // == Pick Peer ==
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        match state.ring.get(key) {
            Some(peer) if peer != self.self_addr => {
                debug!(node = %self.self_addr, %peer, key, "picked peer");
                state
                    .getters
                    .get(peer)
                    .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
            }
            _ => None,
        }
    }
}
