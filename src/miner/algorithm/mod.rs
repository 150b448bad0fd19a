// src/miner/algorithm/mod.rs
//! Hashing algorithms used by the nonce search
//!
//! The search loop only needs a 32-byte digest of the working header, so the
//! algorithm is abstracted behind [`Algorithm`]. The production implementation
//! is [`Sha256d`]; tests plug in engines with fixed outputs.

/// Double SHA-256 implementation
///
/// Bitcoin-style `SHA256(SHA256(data))` backed by a single reusable
/// `sha2::Sha256` context.
pub mod sha256d;

pub use sha256d::{Sha256d, double_sha256, sha256};

/// Common interface for all hashing engines
///
/// An engine may keep internal scratch state (such as a digest context that is
/// reset after every use), which is why [`Algorithm::digest`] takes `&mut self`.
/// Implementations must be deterministic and must never fail on well-formed
/// input.
pub trait Algorithm: Send + Sync {
    /// Compute the 32-byte digest of `input`
    ///
    /// # Arguments
    /// * `input` - The complete working header, nonce included
    fn digest(&mut self, input: &[u8]) -> [u8; 32];
}
