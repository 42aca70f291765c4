//! Name -> group lookup shared by everything that resolves groups by name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::group::{Getter, Group};

// == Group Registry ==
/// Owns every group of the process, keyed by name.
///
/// Built once by the binary and handed to the peer server and API, so lookups
/// never go through hidden global state. Reads far outnumber writes.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates and registers a group.
    ///
    /// A group already registered under `name` is replaced; holders of the old
    /// `Arc<Group>` keep a working but unreachable group.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        getter: impl Getter + 'static,
    ) -> Arc<Group> {
        let name = name.into();
        let group = Arc::new(Group::new(name.clone(), cache_bytes, Arc::new(getter)));

        let previous = self.groups.write().insert(name.clone(), group.clone());
        if previous.is_some() {
            warn!(group = %name, "replaced existing group with the same name");
        } else {
            info!(group = %name, cache_bytes, "group registered");
        }
        group
    }

    // == Get Group ==
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}
