//! Error types for ring configuration.

/// Errors that can occur while parsing ring parameters.
///
/// Building a ring and looking keys up never fail; only the edges that turn
/// user input into ring parameters do.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The requested hash function name is not recognised.
    #[error("unknown hasher {0:?}, expected one of: fnv1a, blake3")]
    UnknownHasher(String),
}
