// src/network/local.rs
use crate::miner::algorithm::double_sha256;
use crate::miner::search::meets_share_target;
use crate::miner::share::decode_header;
use crate::miner::work::{NONCE_LEN, validate_template};
use crate::network::Pool;
use crate::utils::error::MinerError;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pool that serves a fixed template and checks submitted shares itself
///
/// A share is accepted when its payload decodes to the current template with
/// the reported nonce in the nonce field, and the double SHA-256 of that
/// header meets the share target.
pub struct LocalPool {
    template: ArcSwap<Vec<u8>>,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl LocalPool {
    /// Creates a pool serving `template`
    ///
    /// # Errors
    /// Returns `MinerError::TemplateError` for templates a work unit could
    /// not be built from.
    pub fn new(template: Vec<u8>) -> Result<Self, MinerError> {
        validate_template(&template)?;
        Ok(LocalPool {
            template: ArcSwap::from_pointee(template),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        })
    }

    /// Creates a pool from a hex-encoded template
    pub fn from_hex(template: &str) -> Result<Self, MinerError> {
        Self::new(hex::decode(template.trim())?)
    }

    /// Replaces the served template; shares for the old one become stale
    pub fn set_template(&self, template: Vec<u8>) -> Result<(), MinerError> {
        validate_template(&template)?;
        self.template.store(Arc::new(template));
        Ok(())
    }

    /// Shares accepted so far
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Shares rejected so far
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    fn check_share(&self, payload: &str, nonce: u32) -> Result<(), String> {
        let template = self.template.load_full();
        let nonce_offset = template.len() - NONCE_LEN;

        let header = decode_header(payload, template.len()).map_err(|e| e.to_string())?;

        if header[..nonce_offset] != template[..nonce_offset] {
            return Err("stale work".into());
        }
        if header[nonce_offset..] != nonce.to_le_bytes() {
            return Err(format!("nonce mismatch, payload does not carry {:08x}", nonce));
        }
        if !meets_share_target(&double_sha256(&header)) {
            return Err("hash does not meet share target".into());
        }
        Ok(())
    }
}

impl Pool for LocalPool {
    fn fetch_template(&self) -> Result<Vec<u8>, MinerError> {
        Ok(self.template.load_full().to_vec())
    }

    fn submit_share(&self, payload: &str, nonce: u32) -> bool {
        match self.check_share(payload, nonce) {
            Ok(()) => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                log::debug!("Local pool accepted nonce {:08x}", nonce);
                true
            }
            Err(reason) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                log::debug!("Local pool rejected nonce {:08x}: {}", nonce, reason);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::share::encode;

    #[test]
    fn test_fetch_returns_template() {
        let pool = LocalPool::new(vec![3u8; 80]).unwrap();
        assert_eq!(pool.fetch_template().unwrap(), vec![3u8; 80]);

        pool.set_template(vec![4u8; 80]).unwrap();
        assert_eq!(pool.fetch_template().unwrap(), vec![4u8; 80]);
    }

    #[test]
    fn test_rejects_invalid_templates() {
        assert!(LocalPool::new(vec![0u8; 10]).is_err());
        assert!(LocalPool::from_hex("not hex").is_err());

        let pool = LocalPool::from_hex(&"00".repeat(80)).unwrap();
        assert!(pool.set_template(vec![0u8; 2]).is_err());
    }

    #[test]
    fn test_rejects_garbage_and_low_difficulty() {
        let pool = LocalPool::new(vec![0u8; 80]).unwrap();

        assert!(!pool.submit_share("xyz", 0));
        // nonce 0 over a zero header does not hash to a share
        assert!(!pool.submit_share(&encode(&[0u8; 80]), 0));
        assert_eq!(pool.rejected(), 2);
        assert_eq!(pool.accepted(), 0);
    }

    #[test]
    fn test_rejects_nonce_mismatch() {
        let pool = LocalPool::new(vec![0u8; 80]).unwrap();
        assert!(!pool.submit_share(&encode(&[0u8; 80]), 1));
    }
}
