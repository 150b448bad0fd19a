// src/config/mod.rs
//! Configuration management
//!
//! The miner reads a TOML file describing the worker layout, batch size,
//! reporting intervals and the header template to mine on.

/// Core configuration implementation
pub mod config;

// Re-export key items for easy access
pub use config::{Config, PoolConfig};

use crate::utils::error::MinerError;
use std::path::PathBuf;

/// Loads and validates miner configuration from a TOML file
pub fn load(path: impl Into<PathBuf>) -> Result<Config, MinerError> {
    Config::load(path)
}

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
