//! API Module
//!
//! HTTP handlers and routing for the peer protocol and the front-end API.
//!
//! # Peer endpoint
//! - `GET /_peercache/:group/:key` - Value as a bincode [`PeerResponse`](crate::models::PeerResponse)
//!
//! # Front-end endpoints
//! - `GET /api/:group?key=K` - Raw value bytes
//! - `GET /stats/:group` - Group and store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_api_router, create_peer_router};
