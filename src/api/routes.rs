//! API Routes
//!
//! Configures the Axum routers for the peer protocol and the front-end API.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_get_handler, health_handler, peer_get_handler, stats_handler, AppState};

/// Creates the router other nodes talk to.
///
/// `base_path` must start and end with `/`, e.g. `/_peercache/`.
pub fn create_peer_router(state: AppState, base_path: &str) -> Router {
    Router::new()
        .route(&format!("{}:group/:key", base_path), get(peer_get_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the router end users talk to.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/:group", get(api_get_handler))
        .route("/stats/:group", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::group::{GetterFunc, GroupRegistry};
    use crate::models::PeerResponse;
    use crate::peers::DEFAULT_BASE_PATH;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn test_state() -> AppState {
        let registry = Arc::new(GroupRegistry::new());
        registry.new_group(
            "scores",
            1024,
            GetterFunc(|key: &str| match key {
                "Tom" => Ok(b"630".to_vec()),
                "a/b c" => Ok(b"escaped".to_vec()),
                "broken" => Err(CacheError::Source("disk on fire".to_string())),
                _ => Err(CacheError::NotFound(key.to_string())),
            }),
        );
        AppState::new(registry)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_peer_endpoint_encodes_value() {
        let app = create_peer_router(test_state(), DEFAULT_BASE_PATH);

        let (status, body) = get(app, "/_peercache/scores/Tom").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(PeerResponse::decode(&body).unwrap().value, b"630");
    }

    #[tokio::test]
    async fn test_peer_endpoint_decodes_escaped_segments() {
        let app = create_peer_router(test_state(), DEFAULT_BASE_PATH);

        let (status, body) = get(app, "/_peercache/scores/a%2Fb%20c").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(PeerResponse::decode(&body).unwrap().value, b"escaped");
    }

    #[tokio::test]
    async fn test_peer_endpoint_unknown_group() {
        let app = create_peer_router(test_state(), DEFAULT_BASE_PATH);

        let (status, body) = get(app, "/_peercache/nope/Tom").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8_lossy(&body).contains("nope"));
    }

    #[tokio::test]
    async fn test_peer_endpoint_unknown_key_is_server_error() {
        let app = create_peer_router(test_state(), DEFAULT_BASE_PATH);

        let (status, body) = get(app, "/_peercache/scores/Nobody").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8_lossy(&body).contains("Nobody"));
    }

    #[tokio::test]
    async fn test_api_endpoint_unknown_key_is_not_found() {
        let app = create_api_router(test_state());

        let (status, _) = get(app, "/api/scores?key=Nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_peer_endpoint_source_failure() {
        let app = create_peer_router(test_state(), DEFAULT_BASE_PATH);

        let (status, body) = get(app, "/_peercache/scores/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8_lossy(&body).contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_api_endpoint_returns_raw_bytes() {
        let app = create_api_router(test_state());

        let (status, body) = get(app, "/api/scores?key=Tom").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"630");
    }

    #[tokio::test]
    async fn test_api_endpoint_missing_key() {
        let app = create_api_router(test_state());

        let (status, _) = get(app, "/api/scores").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let state = test_state();
        let app = create_api_router(state.clone());
        let _ = get(app.clone(), "/api/scores?key=Tom").await;
        let _ = get(app.clone(), "/api/scores?key=Tom").await;

        let (status, body) = get(app, "/stats/scores").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["gets"], 2);
        assert_eq!(json["cache_hits"], 1);
        assert_eq!(json["local_loads"], 1);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, _) = get(create_api_router(test_state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
