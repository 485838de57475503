//! Consistent hashing ring implementation.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::hasher::{Fnv1a32, RingHasher};

/// A key whose owner differs between two rings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// The key that moved.
    pub key: String,
    /// Owner in the old ring (`None` if the old ring was empty).
    pub from: Option<String>,
    /// Owner in the new ring (`None` if the new ring is empty).
    pub to: Option<String>,
}

/// Consistent hashing ring mapping string keys to node names.
///
/// Each node is placed at `replicas` positions on a `u32` ring. A key is
/// owned by the first position at or after `hash(key)`, wrapping around to
/// the smallest position.
///
/// The ring is built once and never mutated, so lookups can be shared across
/// threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct Ring<H = Fnv1a32> {
    /// Hash function for both replica labels and lookup keys.
    hasher: H,
    /// Virtual positions per node.
    replicas: usize,
    /// Node names in construction order.
    nodes: Vec<String>,
    /// Replica positions, sorted ascending. Colliding positions appear twice.
    positions: Vec<u32>,
    /// Ring position -> node name. On collision the last node written wins.
    owners: HashMap<u32, String>,
}

impl Ring<Fnv1a32> {
    /// Build a ring over `nodes` using the default FNV-1a hasher.
    ///
    /// A `replicas` of zero or an empty node list produces an empty ring on
    /// which every lookup returns `None`.
    pub fn new<I, S>(replicas: usize, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_hasher(Fnv1a32, replicas, nodes)
    }
}

impl<H: RingHasher> Ring<H> {
    /// Build a ring over `nodes` using a custom hasher.
    ///
    /// Replica `i` of node `n` is placed at `hasher.hash("{n}:{i}")`. If two
    /// labels hash to the same position, the later node takes ownership of
    /// it and the position is kept twice in the sorted list.
    pub fn with_hasher<I, S>(hasher: H, replicas: usize, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nodes: Vec<String> = nodes.into_iter().map(Into::into).collect();
        let mut positions = Vec::with_capacity(nodes.len() * replicas);
        let mut owners = HashMap::with_capacity(nodes.len() * replicas);

        for node in &nodes {
            for i in 0..replicas {
                let pos = hasher.hash(&format!("{node}:{i}"));
                positions.push(pos);
                owners.insert(pos, node.clone());
            }
        }

        positions.sort_unstable();

        debug!(
            nodes = nodes.len(),
            replicas,
            positions = positions.len(),
            "built hash ring"
        );

        Self {
            hasher,
            replicas,
            nodes,
            positions,
            owners,
        }
    }

    /// Return the node that owns `key`, or `None` if the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let target = self.hasher.hash(key);

        // First position clockwise from the key; past the end wraps to 0.
        let idx = self.positions.partition_point(|&pos| pos < target);
        let pos = self.positions.get(idx).or(self.positions.first())?;

        self.owners.get(pos).map(String::as_str)
    }

    /// Return the node recorded for a stored ring position.
    pub fn owner_of(&self, position: u32) -> Option<&str> {
        self.owners.get(&position).map(String::as_str)
    }

    /// Count how many of `keys` each node owns.
    ///
    /// Every node of the ring appears in the result, with zero if it owns
    /// none of the sample. An empty ring yields an empty map.
    pub fn distribution<I, K>(&self, keys: I) -> BTreeMap<String, usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        if self.positions.is_empty() {
            return counts;
        }

        for node in &self.nodes {
            counts.entry(node.clone()).or_default();
        }
        for key in keys {
            if let Some(node) = self.get_node(key.as_ref()) {
                *counts.entry(node.to_string()).or_default() += 1;
            }
        }

        counts
    }

    /// Compute which keys change owner between two ring states.
    ///
    /// Returns one [`Reassignment`] per key whose owner differs, in the
    /// order the keys were given.
    pub fn diff<G, K>(old: &Ring<H>, new: &Ring<G>, keys: &[K]) -> Vec<Reassignment>
    where
        G: RingHasher,
        K: AsRef<str>,
    {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                let from = old.get_node(key);
                let to = new.get_node(key);
                (from != to).then(|| Reassignment {
                    key: key.to_string(),
                    from: from.map(str::to_string),
                    to: to.map(str::to_string),
                })
            })
            .collect()
    }

    /// Fraction of `keys` whose owner differs between two ring states.
    ///
    /// Returns `0.0` for an empty sample.
    pub fn moved_fraction<G, K>(old: &Ring<H>, new: &Ring<G>, keys: &[K]) -> f64
    where
        G: RingHasher,
        K: AsRef<str>,
    {
        if keys.is_empty() {
            return 0.0;
        }
        let moved = keys
            .iter()
            .filter(|key| old.get_node(key.as_ref()) != new.get_node(key.as_ref()))
            .count();
        moved as f64 / keys.len() as f64
    }
}

impl<H> Ring<H> {
    /// Return the number of virtual positions per node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Return the number of nodes the ring was built from.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the total number of positions, duplicates included.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Return `true` if the ring has no positions and owns no keys.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Return the node names in construction order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Return the sorted ring positions.
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Return the ring's hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}
