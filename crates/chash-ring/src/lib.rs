//! Consistent hashing ring for deterministic key-to-node assignment.
//!
//! This crate implements a consistent hash ring that maps arbitrary string
//! keys to a fixed set of named nodes. Adding or removing a node only
//! reassigns roughly `1/N` of the keys, instead of rehashing everything as a
//! modulo-N scheme would.
//!
//! The ring uses virtual nodes (replicas): each node gets `replicas`
//! positions on a `u32` ring, determined by `hash("<node>:<index>")`. A key
//! is owned by the first position clockwise from `hash(key)`, wrapping past
//! `u32::MAX` back to the smallest position.
//!
//! The hash function is pluggable through [`RingHasher`]. [`Fnv1a32`] is the
//! default and makes assignments bit-for-bit reproducible across processes;
//! [`Blake3Hasher`] spreads replicas more evenly at low replica counts.
//!
//! A [`Ring`] is immutable once built. Membership changes are expressed by
//! building a new ring; [`Ring::diff`] reports which keys moved.

mod error;
mod hasher;
mod ring;

pub use error::RingError;
pub use hasher::{Blake3Hasher, Fnv1a32, HasherKind, RingHasher, fnv1a_32};
pub use ring::{Reassignment, Ring};
