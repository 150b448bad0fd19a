// src/miner/search.rs
//! Nonce search and the share difficulty check
//!
//! Workers partition the 32-bit nonce space by starting at distinct offsets and
//! advancing with a stride equal to the worker count. Each call to [`search`]
//! covers one batch and can be resumed with the nonce it leaves behind.

use crate::miner::algorithm::Algorithm;
use crate::miner::work::WorkUnit;
use crate::utils::error::MinerError;

/// Number of trailing digest bytes that must be zero for a share
pub const SHARE_ZERO_BYTES: usize = 4;

/// Counts zero bytes at the tail of the digest
///
/// Scans indices 31, 30, 29 and 28 in that order and stops at the first
/// non-zero byte, so the result is between 0 and [`SHARE_ZERO_BYTES`].
#[inline(always)]
pub fn trailing_zero_bytes(digest: &[u8; 32]) -> usize {
    digest[32 - SHARE_ZERO_BYTES..]
        .iter()
        .rev()
        .take_while(|&&b| b == 0)
        .count()
}

/// Standard share target: digest bytes 28..=31 are all zero
///
/// This is a byte-range test, not a numeric comparison against a target.
#[inline(always)]
pub fn meets_share_target(digest: &[u8; 32]) -> bool {
    trailing_zero_bytes(digest) == SHARE_ZERO_BYTES
}

/// Nonce to try after `nonce`
///
/// When adding `stride` would overflow, the sequence wraps to
/// `u32::MAX % stride`. `stride` must be non-zero; [`search`] checks it once
/// before its loop.
#[inline(always)]
pub fn next_nonce(nonce: u32, stride: u32) -> u32 {
    if u32::MAX - stride < nonce {
        u32::MAX % stride
    } else {
        nonce + stride
    }
}

/// Searches up to `batch_size` nonces for a share
///
/// # Arguments
/// * `unit` - Work unit owned by the calling worker
/// * `nonce` - Nonce to start from; updated in place
/// * `batch_size` - Number of candidates to try
/// * `stride` - Step between candidates (the worker count)
///
/// # Returns
/// - `Ok(true)` as soon as a share is found. `nonce` and the unit's working
///   buffer both hold the matching value; the unit is in `ShareFound`.
/// - `Ok(false)` when the batch is exhausted. `nonce` holds the value to resume
///   from.
///
/// Either way the unit's [`last_attempts`](WorkUnit::last_attempts) holds the
/// number of candidates hashed.
///
/// # Errors
/// `MinerError::StrideError` for a zero stride and `MinerError::StateError`
/// for a unit that already found a share or went stale. Both are checked before
/// any hashing happens.
pub fn search<A: Algorithm>(
    unit: &mut WorkUnit<A>,
    nonce: &mut u32,
    batch_size: u32,
    stride: u32,
) -> Result<bool, MinerError> {
    if stride == 0 {
        return Err(MinerError::StrideError);
    }
    unit.begin_batch(batch_size)?;

    for attempt in 1..=batch_size {
        unit.write_nonce(*nonce);
        let digest = unit.current_digest();

        if meets_share_target(&digest) {
            unit.end_batch(attempt);
            unit.share_found();
            return Ok(true);
        }

        *nonce = next_nonce(*nonce, stride);
    }

    unit.end_batch(batch_size);
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkState;
    use test_case::test_case;

    /// Digest that can never satisfy the share target
    #[derive(Clone)]
    struct NeverMatch;

    impl Algorithm for NeverMatch {
        fn digest(&mut self, _input: &[u8]) -> [u8; 32] {
            [0xff; 32]
        }
    }

    /// Digest whose tail is zero only for one specific nonce
    #[derive(Clone)]
    struct MatchAt(u32);

    impl Algorithm for MatchAt {
        fn digest(&mut self, input: &[u8]) -> [u8; 32] {
            let nonce = u32::from_le_bytes(input[input.len() - 4..].try_into().unwrap());
            let mut digest = [0xff; 32];
            if nonce == self.0 {
                digest[28..].fill(0);
            }
            digest
        }
    }

    fn share_digest() -> [u8; 32] {
        let mut digest = [0x5a; 32];
        digest[27] = 0x01;
        digest[28..].fill(0);
        digest
    }

    #[test]
    fn test_share_digest_accepted() {
        assert!(meets_share_target(&share_digest()));
        assert_eq!(trailing_zero_bytes(&share_digest()), 4);
    }

    #[test_case(28; "byte_28")]
    #[test_case(29; "byte_29")]
    #[test_case(30; "byte_30")]
    #[test_case(31; "byte_31")]
    fn test_any_nonzero_tail_byte_rejects(index: usize) {
        let mut digest = share_digest();
        digest[index] = 0x01;
        assert!(!meets_share_target(&digest));
    }

    #[test]
    fn test_bytes_outside_tail_are_ignored() {
        let mut digest = [0u8; 32];
        assert!(meets_share_target(&digest));

        digest[..28].fill(0xff);
        assert!(meets_share_target(&digest));
    }

    #[test]
    fn test_trailing_count_stops_at_first_nonzero() {
        let mut digest = [0u8; 32];
        digest[30] = 1;
        // byte 29 and 28 are zero but the scan never reaches them
        assert_eq!(trailing_zero_bytes(&digest), 1);

        digest[31] = 1;
        assert_eq!(trailing_zero_bytes(&digest), 0);
    }

    #[test]
    fn test_next_nonce_adds_stride() {
        assert_eq!(next_nonce(5, 7), 12);
        assert_eq!(next_nonce(u32::MAX - 5, 5), u32::MAX);
    }

    #[test]
    fn test_next_nonce_wraps() {
        assert_eq!(next_nonce(u32::MAX - 1, 5), u32::MAX % 5);
        assert_eq!(next_nonce(u32::MAX - 1, 5), 0);
        assert_eq!(next_nonce(u32::MAX, 1), 0);
        assert_eq!(next_nonce(u32::MAX, 7), u32::MAX % 7);
    }

    #[test]
    fn test_batch_exhaustion_advances_nonce() {
        let mut unit = WorkUnit::with_algorithm(vec![0u8; 80], NeverMatch).unwrap();
        let start = u32::MAX - 20;
        let mut nonce = start;

        assert!(!search(&mut unit, &mut nonce, 10, 3).unwrap());

        let expected = (0..10).fold(start, |n, _| next_nonce(n, 3));
        assert_eq!(nonce, expected);
        assert_eq!(unit.state(), WorkState::Searching);
        assert_eq!(unit.last_batch_size(), 10);
        assert_eq!(unit.last_attempts(), 10);
    }

    #[test]
    fn test_resumes_across_batches() {
        let mut unit = WorkUnit::with_algorithm(vec![0u8; 80], NeverMatch).unwrap();
        let mut nonce = 2;

        search(&mut unit, &mut nonce, 4, 4).unwrap();
        search(&mut unit, &mut nonce, 4, 4).unwrap();

        assert_eq!(nonce, 2 + 8 * 4);
    }

    #[test]
    fn test_share_short_circuits_batch() {
        let mut unit = WorkUnit::with_algorithm(vec![0u8; 80], MatchAt(19)).unwrap();
        let mut nonce = 5;

        assert!(search(&mut unit, &mut nonce, 100, 7).unwrap());
        assert_eq!(nonce, 19);
        assert_eq!(unit.nonce(), 19);
        assert_eq!(unit.state(), WorkState::ShareFound);
        assert_eq!(unit.final_nonce(), None);
        // 5, 12, 19
        assert_eq!(unit.last_attempts(), 3);
        assert_eq!(unit.last_batch_size(), 100);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut unit = WorkUnit::new(vec![0u8; 80]).unwrap();
        assert_eq!(unit.nonce_offset(), 76);
        let mut nonce = 5;

        assert!(!search(&mut unit, &mut nonce, 3, 7).unwrap());
        assert_eq!(nonce, 26);
        assert_eq!(unit.nonce(), 19);
    }

    #[test]
    fn test_zero_batch_is_a_no_op() {
        let mut unit = WorkUnit::with_algorithm(vec![0u8; 80], NeverMatch).unwrap();
        let mut nonce = 9;

        assert!(!search(&mut unit, &mut nonce, 0, 1).unwrap());
        assert_eq!(nonce, 9);
        assert_eq!(unit.nonce(), 0);
    }

    #[test]
    fn test_zero_stride_rejected_before_hashing() {
        let mut unit = WorkUnit::with_algorithm(vec![0u8; 80], MatchAt(0)).unwrap();
        let mut nonce = 0;

        assert!(matches!(
            search(&mut unit, &mut nonce, 10, 0),
            Err(MinerError::StrideError)
        ));
        assert_eq!(unit.state(), WorkState::Created);
    }

    #[test]
    fn test_closed_units_are_rejected() {
        let mut unit = WorkUnit::with_algorithm(vec![0u8; 80], MatchAt(0)).unwrap();
        let mut nonce = 0;
        assert!(search(&mut unit, &mut nonce, 1, 1).unwrap());

        assert!(matches!(
            search(&mut unit, &mut nonce, 1, 1),
            Err(MinerError::StateError(WorkState::ShareFound))
        ));

        let mut stale = WorkUnit::with_algorithm(vec![0u8; 80], NeverMatch).unwrap();
        stale.mark_stale();
        assert!(matches!(
            search(&mut stale, &mut nonce, 1, 1),
            Err(MinerError::StateError(WorkState::Stale))
        ));
    }
}
