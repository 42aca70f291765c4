//! Request DTOs
//!
//! Defines the parameters carried by incoming HTTP requests.

use serde::{Deserialize, Serialize};

/// A peer asking this node for one key, parsed from
/// `/<base_path>/<group>/<key>` with both segments percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRequest {
    /// Name of the group to look the key up in
    pub group: String,
    /// The cache key
    pub key: String,
}

/// Query string of the front-end API (`?key=...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    #[serde(default)]
    pub key: String,
}
