//! Peercache node
//!
//! Runs one cache node: the peer endpoint other nodes query, and optionally a
//! front-end API for end users. The demo group is backed by a small in-memory
//! "slow database".

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peercache::api::{create_api_router, create_peer_router, AppState};
use peercache::{CacheError, Config, GetterFunc, GroupRegistry, HttpPool};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the demo group and wire it to the peer pool
/// 4. Start the front-end API if `API_PORT` is set
/// 5. Serve peers until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, group={}, cache_bytes={}, replicas={}",
        config.self_addr, config.peers, config.group_name, config.cache_bytes, config.replicas
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = registry.new_group(&config.group_name, config.cache_bytes, slow_db());

    let pool = Arc::new(HttpPool::with_options(
        &config.self_addr,
        config.pool_options(),
    )?);
    pool.set_peers(&config.peers);
    group.register_peers(pool.clone())?;

    let state = AppState::new(registry);

    if let Some(api_port) = config.api_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], api_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding API listener on {}", addr))?;
        let app = create_api_router(state.clone());
        info!("Front-end API listening on http://{}", addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("API server stopped: {}", e);
            }
        });
    }

    let port = config
        .server_port()
        .context("SELF_ADDR must include a port, e.g. http://localhost:8001")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding peer listener on {}", addr))?;
    info!("Cache node {} listening on http://{}", config.self_addr, addr);

    let app = create_peer_router(state, pool.base_path());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Node shutdown complete");
    Ok(())
}

/// Source for the demo group.
fn slow_db() -> GetterFunc<impl Fn(&str) -> peercache::Result<Vec<u8>> + Send + Sync> {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    GetterFunc(move |key: &str| {
        info!("[SlowDB] search key {}", key);
        db.get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or_else(|| CacheError::NotFound(format!("{} not found", key)))
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
