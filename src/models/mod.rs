//! Request and Response models
//!
//! DTOs for the peer protocol and the front-end API.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{KeyQuery, PeerRequest};
pub use responses::{HealthResponse, PeerResponse, StatsResponse};
