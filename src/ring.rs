//! Consistent Hash Ring
//!
//! Maps keys onto node identifiers through a ring of virtual nodes.
//!
//! Each real node is hashed `replicas` times (as `"{i}{node}"`) onto a 32-bit
//! circle. A key belongs to the first virtual node at or after its own hash,
//! wrapping back to the smallest position past the top of the circle.

use std::collections::HashMap;
use std::fmt;

/// 32-bit hash function used to place nodes and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default number of virtual nodes per real node.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node positions
    positions: Vec<u32>,
    /// Virtual node position -> real node
    nodes: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring hashing with CRC-32C.
    ///
    /// Positions differ from rings hashed with IEEE CRC-32, so every node of a
    /// cluster must use the same hash to agree on key ownership.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32c::crc32c)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Places every node on the ring `replicas` times.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, node).as_bytes());
                // Colliding positions keep a single entry; the later node wins.
                if self.nodes.insert(position, node.to_string()).is_none() {
                    self.positions.push(position);
                }
            }
        }
        self.positions.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&p| p < hash);
        let position = self.positions[idx % self.positions.len()];
        self.nodes.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of virtual node positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .finish()
    }
}
