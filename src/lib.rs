//! getwork share miner - pooled double SHA-256 nonce search in Rust
//!
//! This crate provides the core of a CPU share miner:
//! - Double SHA-256 hashing with a reusable digest context
//! - Work units sharing one header template across worker threads
//! - A batched, resumable nonce search partitioned by stride
//! - The standard share check on digest bytes 28..=31
//! - getwork-style share encoding (word flip + SHA-256 padding)
//! - Per-worker status lines and aggregate statistics

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Nonce search, work units, share encoding and worker orchestration
pub mod miner;

/// Pool collaborator contract and the in-process pool
pub mod network;

/// Statistics collection and reporting functionality
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{Algorithm, MiningJob, Scheduler, Sha256d, Share, WorkUnit, Worker, search};
pub use network::{LocalPool, Pool};
pub use stats::{HardwareStats, MiningStats, RateReporter, StatsReporter};
pub use types::WorkState;
pub use utils::{MinerError, init_logging};
