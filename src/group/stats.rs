//! Per-group counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Lock-free counters updated along the get path.
#[derive(Debug, Default)]
pub struct GroupStats {
    /// Any get request, including from peers
    pub gets: AtomicU64,
    /// Served from the local store
    pub cache_hits: AtomicU64,
    /// Local misses, before coalescing
    pub loads: AtomicU64,
    /// Loads actually executed after coalescing
    pub loads_deduped: AtomicU64,
    /// Values fetched from the owning peer
    pub peer_loads: AtomicU64,
    /// Peer fetches that failed and fell back to the source
    pub peer_errors: AtomicU64,
    /// Values loaded from the source
    pub local_loads: AtomicU64,
    /// Source failures, returned to the caller
    pub local_load_errs: AtomicU64,
    /// Requests received from other nodes
    pub server_requests: AtomicU64,
}

/// Plain copy of [`GroupStats`] for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStatsSnapshot {
    pub gets: u64,
    pub cache_hits: u64,
    pub loads: u64,
    pub loads_deduped: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub local_loads: u64,
    pub local_load_errs: u64,
    pub server_requests: u64,
}

impl GroupStats {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GroupStatsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        GroupStatsSnapshot {
            gets: load(&self.gets),
            cache_hits: load(&self.cache_hits),
            loads: load(&self.loads),
            loads_deduped: load(&self.loads_deduped),
            peer_loads: load(&self.peer_loads),
            peer_errors: load(&self.peer_errors),
            local_loads: load(&self.local_loads),
            local_load_errs: load(&self.local_load_errs),
            server_requests: load(&self.server_requests),
        }
    }
}
