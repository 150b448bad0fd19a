// src/miner/mod.rs
//! Core mining functionality
//!
//! This module contains all components of the nonce search:
//! - Hashing engines (double SHA-256)
//! - Work units holding the header template and a working copy
//! - The batched nonce search and share difficulty check
//! - Share encoding for submission
//! - Job scheduling and worker threads

/// Hashing engines
pub mod algorithm;

/// Mining job scheduler
///
/// Holds the current job and spawns one worker per nonce partition.
pub mod scheduler;

/// Batched nonce search and share target
pub mod search;

/// Share payload encoding
pub mod share;

/// Header template plus per-worker working buffer
pub mod work;

/// Worker thread implementation
///
/// Drives the nonce search in batches and forwards found shares.
pub mod worker;

// Re-export main components for cleaner imports
pub use self::algorithm::{Algorithm, Sha256d};
pub use self::scheduler::{MiningJob, Scheduler};
pub use self::search::{meets_share_target, next_nonce, search};
pub use self::share::Share;
pub use self::work::WorkUnit;
pub use self::worker::Worker;
