//! Shared helpers for chash integration tests.
//!
//! Provides reproducible key samples and node name lists so every test
//! target exercises the ring with the same inputs.

use chash_ring::{Fnv1a32, RingHasher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sequential keys `key-0`, `key-1`, ...
pub fn sample_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i}")).collect()
}

/// Random hex keys from a seeded RNG, identical for the same seed.
pub fn random_keys(seed: u64, count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| format!("{:016x}", rng.random::<u64>()))
        .collect()
}

/// Node names `node1`..`node{count}`.
pub fn node_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("node{i}")).collect()
}

/// FNV-1a everywhere except for pinned inputs.
///
/// Lets a test force a key (or a replica label) onto a chosen position while
/// the rest of the ring keeps its normal layout.
pub struct PinnedHasher {
    pins: Vec<(String, u32)>,
}

impl PinnedHasher {
    /// Create a hasher with the given `(input, position)` overrides.
    pub fn new(pins: &[(&str, u32)]) -> Self {
        Self {
            pins: pins.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

impl RingHasher for PinnedHasher {
    fn hash(&self, input: &str) -> u32 {
        self.pins
            .iter()
            .find(|(k, _)| k == input)
            .map(|(_, v)| *v)
            .unwrap_or_else(|| Fnv1a32.hash(input))
    }
}

/// Fraction of `keys` a naive `hash % n` scheme moves when going from
/// `old_n` to `new_n` buckets.
pub fn modulo_moved_fraction(keys: &[String], old_n: u32, new_n: u32) -> f64 {
    if keys.is_empty() {
        return 0.0;
    }
    let moved = keys
        .iter()
        .filter(|k| {
            let h = Fnv1a32.hash(k);
            h % old_n != h % new_n
        })
        .count();
    moved as f64 / keys.len() as f64
}
