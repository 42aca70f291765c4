//! API Handlers
//!
//! HTTP request handlers for the peer and front-end endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry};
use crate::models::{HealthResponse, KeyQuery, PeerRequest, PeerResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Every group this node serves
    pub registry: Arc<GroupRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }

    fn group(&self, name: &str) -> Result<Arc<Group>> {
        self.registry
            .get_group(name)
            .ok_or_else(|| CacheError::GroupNotFound(name.to_string()))
    }
}

/// Handler for GET /<base_path>/:group/:key
///
/// Serves a key to another node. An unknown group is answered with 404, any
/// other failure with 500.
pub async fn peer_get_handler(
    State(state): State<AppState>,
    Path(req): Path<PeerRequest>,
) -> Response {
    debug!(group = %req.group, key = %req.key, "peer request");
    serve_peer(&state, &req)
        .await
        .unwrap_or_else(CacheError::into_peer_response)
}

async fn serve_peer(state: &AppState, req: &PeerRequest) -> Result<Response> {
    let group = state.group(&req.group)?;
    group.record_server_request();

    let view = group.get(&req.key).await?;
    let body = PeerResponse::new(view.byte_slice()).encode()?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], body).into_response())
}

/// Handler for GET /api/:group?key=K
///
/// Returns the raw value bytes to an end user.
pub async fn api_get_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Result<Response> {
    let group = state.group(&group)?;
    let view = group.get(&query.key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.into_bytes(),
    )
        .into_response())
}

/// Handler for GET /stats/:group
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state.group(&group)?;
    Ok(Json(StatsResponse::new(
        group.name(),
        group.stats(),
        group.cache_stats(),
    )))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
