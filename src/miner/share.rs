// src/miner/share.rs
//! Share encoding for getwork-style submission
//!
//! Pools expecting the legacy getwork format want the header as big-endian
//! 32-bit words followed by the SHA-256 padding block, hex encoded. For an
//! 80-byte header that is 128 bytes (256 hex characters):
//!
//! ```text
//! flip32(header) || 00000080 || 00 * 40 || 80020000
//! ```

use crate::network::Pool;
use crate::utils::error::MinerError;

const WORD: usize = 4;
const BLOCK: usize = 64;
const LENGTH_FIELD: usize = 8;

/// A found share ready to be handed to the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Worker that found the share
    pub worker_id: usize,
    /// Nonce that produced the qualifying digest
    pub nonce: u32,
    /// Encoded submission payload (hex)
    pub payload: String,
}

impl Share {
    /// Submits this share through `pool`
    ///
    /// The pool handle is passed in rather than stored on the share or the
    /// work unit. Failures are returned as `false` and never retried here.
    pub fn submit(&self, pool: &dyn Pool) -> bool {
        let accepted = pool.submit_share(&self.payload, self.nonce);
        if accepted {
            log::info!("Share from worker {} accepted (nonce {:08x})", self.worker_id, self.nonce);
        } else {
            log::warn!("Share from worker {} rejected (nonce {:08x})", self.worker_id, self.nonce);
        }
        accepted
    }
}

/// Reverses the byte order inside every 4-byte word
///
/// A trailing partial word is left as is.
pub fn endian_flip_32(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for word in out.chunks_exact_mut(WORD) {
        word.reverse();
    }
    out
}

/// SHA-256 message padding for a `len`-byte message
///
/// A `0x80` marker, zero fill up to 56 mod 64, then the message length in
/// bits as a 64-bit big-endian integer.
pub fn padding(len: usize) -> Vec<u8> {
    let zeros = (BLOCK * 2 - (len + 1 + LENGTH_FIELD) % BLOCK) % BLOCK;
    let mut pad = Vec::with_capacity(1 + zeros + LENGTH_FIELD);
    pad.push(0x80);
    pad.resize(1 + zeros, 0);
    pad.extend_from_slice(&((len as u64) * 8).to_be_bytes());
    pad
}

/// Length in bytes of the padded message for a `len`-byte header
pub fn padded_len(len: usize) -> usize {
    len + padding(len).len()
}

/// Encodes a working header into the submission payload
///
/// Flips the header word by word, then appends the padding in the same
/// flipped word order.
pub fn encode(working: &[u8]) -> String {
    let mut data = endian_flip_32(working);
    data.extend_from_slice(&endian_flip_32(&padding(working.len())));
    hex::encode(data)
}

/// Recovers the first `header_len` header bytes from an encoded payload
///
/// # Errors
/// `MinerError::InputError` if the payload is not hex, or is too short to
/// hold a padded header of that length.
pub fn decode_header(payload: &str, header_len: usize) -> Result<Vec<u8>, MinerError> {
    let data = hex::decode(payload)?;
    if data.len() < padded_len(header_len) || data.len() % WORD != 0 {
        return Err(MinerError::InputError(format!(
            "payload of {} bytes cannot hold a {}-byte header",
            data.len(),
            header_len
        )));
    }

    let mut header = endian_flip_32(&data);
    header.truncate(header_len);
    Ok(header)
}
