//! Hash functions that place node labels and lookup keys on the ring.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RingError;

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 0x0100_0193;

/// Maps a string to a position on the 32-bit ring.
///
/// Implementations must be deterministic, ideally across process restarts,
/// and should spread inputs evenly over the `u32` space. Collision resistance
/// is not required.
///
/// Any `Fn(&str) -> u32` is a hasher, so a plain function or closure can be
/// plugged in without a wrapper type.
pub trait RingHasher {
    /// Hash `input` to a ring position.
    fn hash(&self, input: &str) -> u32;
}

impl<F> RingHasher for F
where
    F: Fn(&str) -> u32,
{
    fn hash(&self, input: &str) -> u32 {
        self(input)
    }
}

/// FNV-1a over raw bytes: XOR each byte into the state, then multiply.
pub const fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// The FNV-1a 32-bit hash, the ring's default.
///
/// Fast and stable across platforms and releases, which makes assignments
/// usable as golden output. Similar labels cluster, so use a few hundred
/// replicas per node when balance matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fnv1a32;

impl RingHasher for Fnv1a32 {
    fn hash(&self, input: &str) -> u32 {
        fnv1a_32(input.as_bytes())
    }
}

/// BLAKE3 truncated to its first four bytes (little-endian).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl RingHasher for Blake3Hasher {
    fn hash(&self, input: &str) -> u32 {
        let hash = blake3::hash(input.as_bytes());
        let b = hash.as_bytes();
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }
}

/// Hash function selected at runtime, e.g. from a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    /// [`Fnv1a32`].
    #[default]
    Fnv1a,
    /// [`Blake3Hasher`].
    Blake3,
}

impl HasherKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HasherKind::Fnv1a => "fnv1a",
            HasherKind::Blake3 => "blake3",
        }
    }
}

impl RingHasher for HasherKind {
    fn hash(&self, input: &str) -> u32 {
        match self {
            HasherKind::Fnv1a => Fnv1a32.hash(input),
            HasherKind::Blake3 => Blake3Hasher.hash(input),
        }
    }
}

impl FromStr for HasherKind {
    type Err = RingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fnv1a" | "fnv" | "fnv1a32" => Ok(HasherKind::Fnv1a),
            "blake3" => Ok(HasherKind::Blake3),
            _ => Err(RingError::UnknownHasher(s.to_string())),
        }
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
