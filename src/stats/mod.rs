//! Statistics collection and reporting
//!
//! Two levels of reporting live here:
//! - [`RateReporter`]: the per-worker status line (template, nonce progress,
//!   current digest, estimated speed)
//! - [`StatsReporter`]: totals across all workers (hashes, accepted/rejected
//!   shares) plus hardware readings, logged periodically

/// Per-worker status rendering
pub mod rate;

/// Aggregate statistics collector
///
/// The reporter handles:
/// - Atomic collection of hash and share counts
/// - Hardware monitoring
/// - Periodic reporting of stats
pub mod reporter;

pub use rate::RateReporter;
pub use reporter::{HardwareStats, MiningStats, ShareResult, StatsReporter, format_hashrate};
