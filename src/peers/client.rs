//! HTTP client for one remote peer.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::PeerResponse;
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// Talks to a single peer at `{base_url}{group}/{key}`.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    /// `base_url` is the peer address joined with the pool's base path,
    /// e.g. `http://10.0.0.2:8001/_peercache/`.
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key);
        debug!(%url, "fetching from peer");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::Peer(e.to_string()))?;

        if res.status() != StatusCode::OK {
            return Err(CacheError::Peer(format!("server returned: {}", res.status())));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| CacheError::Peer(format!("reading response body: {}", e)))?;

        Ok(PeerResponse::decode(&body)?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_escapes_group_and_key() {
        let getter = HttpGetter::new("http://peer:8001/_peercache/", reqwest::Client::new());
        assert_eq!(
            getter.url_for("my group", "a/b?c"),
            "http://peer:8001/_peercache/my%20group/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_a_peer_error() {
        // Nothing listens on port 9 of the loopback interface
        let getter = HttpGetter::new("http://127.0.0.1:9/_peercache/", reqwest::Client::new());
        let err = getter.get("scores", "Tom").await.unwrap_err();
        assert!(err.is_remote(), "unexpected error: {:?}", err);
    }
}
