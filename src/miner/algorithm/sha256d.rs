// src/miner/algorithm/sha256d.rs
//! Double SHA-256 engine
//!
//! The share difficulty check runs on `SHA256(SHA256(header))`. Hashing happens
//! millions of times per second per worker, so [`Sha256d`] keeps one hasher
//! around and resets it with `finalize_reset` instead of building a fresh one
//! per candidate.

use crate::miner::algorithm::Algorithm;
use sha2::{Digest, Sha256};

/// Double SHA-256 hashing engine with a reusable digest context
#[derive(Clone, Default)]
pub struct Sha256d {
    context: Sha256,
}

impl Sha256d {
    /// Creates a new engine with a fresh digest context
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a single SHA-256 pass over `input`
    pub fn sha256(&mut self, input: &[u8]) -> [u8; 32] {
        self.context.update(input);
        to_array(&self.context.finalize_reset())
    }
}

impl Algorithm for Sha256d {
    /// Computes `SHA256(SHA256(input))`
    ///
    /// The input buffer is only read. The context is left reset, so the next
    /// call starts from a clean state.
    #[inline]
    fn digest(&mut self, input: &[u8]) -> [u8; 32] {
        self.context.update(input);
        let first = self.context.finalize_reset();
        self.context.update(first);
        to_array(&self.context.finalize_reset())
    }
}

/// One-off SHA-256 of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    to_array(&Sha256::digest(data))
}

/// One-off double SHA-256 of `data`.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    to_array(&Sha256::digest(first))
}

#[inline(always)]
fn to_array(digest: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256(b"hello"),
            hex!("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[test]
    fn test_double_sha256_known_vector() {
        assert_eq!(
            double_sha256(b"hello"),
            hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50")
        );
    }

    #[test]
    fn test_engine_matches_one_off_functions() {
        let mut engine = Sha256d::new();
        assert_eq!(engine.sha256(b"hello"), sha256(b"hello"));
        assert_eq!(engine.digest(b"hello"), double_sha256(b"hello"));
    }

    #[test]
    fn test_context_is_reset_between_calls() {
        let mut engine = Sha256d::new();
        let first = engine.digest(&[0u8; 80]);
        let _ = engine.digest(b"something else entirely");
        let again = engine.digest(&[0u8; 80]);

        assert_eq!(first, again);
        assert_eq!(first, double_sha256(&[0u8; 80]));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = [0xabu8; 80];
        let copy = input;
        let _ = Sha256d::new().digest(&input);
        assert_eq!(input, copy);
    }
}
