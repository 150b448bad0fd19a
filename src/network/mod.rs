// src/network/mod.rs
//! Pool collaborator contract
//!
//! The miner core never talks to the network itself. Whatever supplies header
//! templates and accepts shares implements [`Pool`], and the handle is passed
//! explicitly to the code that submits shares.

/// In-process pool that validates shares locally
///
/// Used for offline mining, benchmarks and tests.
pub mod local;

pub use local::LocalPool;

use crate::utils::error::MinerError;

/// Source of work and sink for shares
pub trait Pool: Send + Sync {
    /// Returns the current header template
    ///
    /// # Errors
    /// Returns `MinerError::PoolError` if no work is available.
    fn fetch_template(&self) -> Result<Vec<u8>, MinerError>;

    /// Submits an encoded share
    ///
    /// # Arguments
    /// * `payload` - Hex payload produced by [`encode`](crate::miner::share::encode)
    /// * `nonce` - Nonce that produced the share
    ///
    /// # Returns
    /// `true` if the pool accepted the share. Retrying is the pool's business.
    fn submit_share(&self, payload: &str, nonce: u32) -> bool;
}
