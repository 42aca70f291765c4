//! Response DTOs
//!
//! Defines the bodies written back to peers and API clients.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::error::{CacheError, Result};
use crate::group::GroupStatsSnapshot;

/// Body of a successful peer response.
///
/// Encoded with bincode: a little-endian u64 length followed by the value bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub value: Vec<u8>,
}

impl PeerResponse {
    pub fn new(value: Vec<u8>) -> Self {
        Self { value }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| CacheError::Internal(format!("encoding response: {}", e)))
    }

    pub fn decode(body: &[u8]) -> Result<Self> {
        bincode::deserialize(body).map_err(|e| CacheError::Decode(format!("decoding response body: {}", e)))
    }
}

/// Response body for the stats endpoint (GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub group: String,
    #[serde(flatten)]
    pub counters: GroupStatsSnapshot,
    /// Local LRU store
    pub cache: CacheStats,
    /// cache_hits / gets
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(group: impl Into<String>, counters: GroupStatsSnapshot, cache: CacheStats) -> Self {
        let hit_rate = if counters.gets > 0 {
            counters.cache_hits as f64 / counters.gets as f64
        } else {
            0.0
        };
        Self {
            group: group.into(),
            counters,
            cache,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_response_layout() {
        let body = PeerResponse::new(b"630".to_vec()).encode().unwrap();
        assert_eq!(body, vec![3, 0, 0, 0, 0, 0, 0, 0, b'6', b'3', b'0']);
        assert_eq!(PeerResponse::decode(&body).unwrap().value, b"630");
    }

    #[test]
    fn test_malformed_peer_response_is_decode_error() {
        let err = PeerResponse::decode(b"junk").unwrap_err();
        assert!(matches!(err, CacheError::Decode(_)));

        // Length prefix promises more bytes than are present
        let err = PeerResponse::decode(&[9, 0, 0, 0, 0, 0, 0, 0, b'x']).unwrap_err();
        assert!(matches!(err, CacheError::Decode(_)));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let counters = GroupStatsSnapshot {
            gets: 10,
            cache_hits: 8,
            ..Default::default()
        };
        let resp = StatsResponse::new("scores", counters, CacheStats::default());
        assert!((resp.hit_rate - 0.8).abs() < 0.001);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["group"], "scores");
        assert_eq!(json["cache_hits"], 8);
        assert_eq!(json["cache"]["items"], 0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
