//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP surfaces.
///
/// Errors are `Clone` because every caller coalesced onto one load receives
/// the same result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty or otherwise unusable key, rejected before any lookup
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The backing source has no value for the key
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The backing source failed for another reason
    #[error("Source error: {0}")]
    Source(String),

    /// Network error or non-success status talking to a peer
    #[error("Peer error: {0}")]
    Peer(String),

    /// A peer answered with a body that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// No group registered under that name
    #[error("No such group: {0}")]
    GroupNotFound(String),

    /// `register_peers` was called a second time on the same group
    #[error("Peers already registered for group: {0}")]
    PeersAlreadyRegistered(String),

    /// The load this caller was waiting on was dropped before it finished
    #[error("Load cancelled: {0}")]
    Cancelled(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// True for failures of a remote peer, which the group recovers from
    /// by loading locally.
    pub fn is_remote(&self) -> bool {
        matches!(self, CacheError::Peer(_) | CacheError::Decode(_))
    }

    /// Response for the peer endpoint: an unknown group is 404, every failed
    /// lookup or encoding is a server error regardless of its cause.
    pub fn into_peer_response(self) -> Response {
        let status = match &self {
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, &self)
    }
}

fn error_response(status: StatusCode, err: &CacheError) -> Response {
    let body = Json(json!({
        "error": err.to_string()
    }));

    (status, body).into_response()
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) | CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error_response(status, &self)
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
