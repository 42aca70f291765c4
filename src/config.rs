//! Configuration Module
//!
//! Handles loading node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::peers::{normalize_addr, PoolOptions, DEFAULT_BASE_PATH};
use crate::ring::DEFAULT_REPLICAS;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL other nodes use to reach this one
    pub self_addr: String,
    /// Base URLs of every node in the cluster, this one included
    pub peers: Vec<String>,
    /// Name of the group this node serves
    pub group_name: String,
    /// Byte budget of the group's LRU store
    pub cache_bytes: usize,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Timeout for one request to a peer, in milliseconds
    pub peer_timeout_ms: u64,
    /// Port of the front-end API, disabled when unset
    pub api_port: Option<u16>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SELF_ADDR` - This node's base URL (default: http://localhost:8001)
    /// - `PEERS` - Comma-separated base URLs (default: `SELF_ADDR` only)
    /// - `GROUP_NAME` - Group name (default: scores)
    /// - `CACHE_BYTES` - LRU byte budget (default: 2048)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `PEER_TIMEOUT_MS` - Peer request timeout (default: 3000)
    /// - `API_PORT` - Front-end API port (default: disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let self_addr = env::var("SELF_ADDR")
            .map(|v| normalize_addr(&v))
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.self_addr);
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| vec![self_addr.clone()]);

        Self {
            self_addr,
            peers,
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            peer_timeout_ms: parse_var("PEER_TIMEOUT_MS").unwrap_or(defaults.peer_timeout_ms),
            api_port: parse_var("API_PORT"),
        }
    }

    /// Port to bind the peer server on, taken from `self_addr`.
    pub fn server_port(&self) -> Option<u16> {
        self.self_addr
            .trim_end_matches('/')
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: self.replicas,
            timeout: Duration::from_millis(self.peer_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_addr = "http://localhost:8001".to_string();
        Self {
            peers: vec![self_addr.clone()],
            self_addr,
            group_name: "scores".to_string(),
            cache_bytes: 2 << 10,
            replicas: DEFAULT_REPLICAS,
            peer_timeout_ms: 3000,
            api_port: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_peers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize_addr)
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.self_addr, "http://localhost:8001");
        assert_eq!(config.peers, vec!["http://localhost:8001"]);
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.replicas, 50);
        assert!(config.api_port.is_none());
    }

    #[test]
    fn test_server_port() {
        let mut config = Config::default();
        assert_eq!(config.server_port(), Some(8001));

        config.self_addr = "http://10.0.0.7:9100/".to_string();
        assert_eq!(config.server_port(), Some(9100));

        config.self_addr = "http://no-port".to_string();
        assert_eq!(config.server_port(), None);
    }

    #[test]
    fn test_parse_peers() {
        let peers = parse_peers(" http://a:1/, http://b:2 ,,");
        assert_eq!(peers, vec!["http://a:1", "http://b:2"]);
    }

    #[test]
    fn test_pool_options() {
        let config = Config {
            replicas: 7,
            peer_timeout_ms: 250,
            ..Config::default()
        };
        let options = config.pool_options();
        assert_eq!(options.replicas, 7);
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.base_path, DEFAULT_BASE_PATH);
    }
}
