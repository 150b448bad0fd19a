// src/stats/rate.rs
//! Per-worker status lines
//!
//! Each worker owns its own [`RateReporter`], so the "time since last report"
//! used for the speed figure is never shared between threads. The caller
//! passes the number of hashes done since its previous report, so the speed
//! holds however many batches ran in between.

use crate::miner::algorithm::Algorithm;
use crate::miner::work::WorkUnit;
use std::time::{Duration, Instant};

/// Renders human-readable progress for one worker
#[derive(Debug, Clone)]
pub struct RateReporter {
    last_report: Instant,
}

impl Default for RateReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateReporter {
    /// Creates a reporter whose first interval starts now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a reporter whose first interval starts at `start`
    pub fn starting_at(start: Instant) -> Self {
        RateReporter { last_report: start }
    }

    /// Start of the current reporting interval
    pub fn last_report(&self) -> Instant {
        self.last_report
    }

    /// Renders the status of `unit` at `nonce` and restarts the interval
    ///
    /// `hashes` is the number of candidates hashed since the previous report.
    pub fn report<A: Algorithm>(
        &mut self,
        unit: &mut WorkUnit<A>,
        nonce: u32,
        hashes: u64,
    ) -> String {
        self.report_at(unit, nonce, hashes, Instant::now())
    }

    /// Same as [`report`](Self::report) with an explicit clock reading
    ///
    /// Output format:
    /// ```text
    /// Worker 0 Data: <template hex>
    /// Nonce: <nonce LE hex>/ffffffff 12.34%
    /// Hash: <current digest hex>
    /// Speed: 1234Kh/s
    /// ```
    pub fn report_at<A: Algorithm>(
        &mut self,
        unit: &mut WorkUnit<A>,
        nonce: u32,
        hashes: u64,
        now: Instant,
    ) -> String {
        let span = now.saturating_duration_since(self.last_report);
        self.last_report = now;

        let digest = unit.current_digest();

        format!(
            "Worker {} Data: {}\nNonce: {}/{} {:.2}%\nHash: {}\nSpeed: {}Kh/s",
            unit.worker_id(),
            hex::encode(unit.template().as_ref()),
            hex::encode(nonce.to_le_bytes()),
            hex::encode(u32::MAX.to_le_bytes()),
            nonce_progress(nonce),
            hex::encode(digest),
            kilo_hash_rate(hashes, span),
        )
    }
}

/// Position of `nonce` in the 32-bit space, as a percentage
pub fn nonce_progress(nonce: u32) -> f64 {
    nonce as f64 / u32::MAX as f64 * 100.0
}

/// Thousands of hashes per second for `hashes` done over `span`
///
/// The count is scaled down to whole thousands before dividing, so fewer
/// than 1000 hashes report zero.
pub fn kilo_hash_rate(hashes: u64, span: Duration) -> u64 {
    let seconds = span.as_secs_f64().max(1e-6);
    ((hashes / 1000) as f64 / seconds) as u64
}
