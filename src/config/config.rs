// src/config/config.rs
use crate::miner::work::validate_template;
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the mining application
///
/// Contains the worker layout, batch tuning, reporting intervals and the
/// pool section describing where work comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of worker threads, which is also the nonce stride
    /// (default: number of CPU cores)
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Nonces per search batch; larger batches mean less overhead but
    /// slower reaction to stop requests and new work
    /// (default: 100000)
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Seconds between per-worker status lines (default: 10)
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,

    /// Seconds between aggregate statistics summaries (default: 60)
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,

    /// Work source configuration
    pub pool: PoolConfig,
}

/// Where header templates come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Hex-encoded header template (80 bytes for a block header)
    pub template: String,

    /// Name used in log output
    #[serde(default = "default_worker_name")]
    pub worker_name: String,
}

fn default_worker_threads() -> usize {
    num_cpus::get()
}

fn default_batch_size() -> u32 {
    100_000
}

fn default_status_interval() -> u64 {
    10
}

fn default_report_interval() -> u64 {
    60
}

fn default_worker_name() -> String {
    "worker01".into()
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(MinerError)` - If the file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::parse(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string without validating it
    pub fn parse(config_str: &str) -> Result<Self, MinerError> {
        toml::from_str(config_str)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))
    }

    /// Checks values the miner cannot run with
    ///
    /// Zero workers would mean a zero nonce stride, so it is rejected here
    /// rather than inside the search loop.
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.worker_threads == 0 || u32::try_from(self.worker_threads).is_err() {
            return Err(MinerError::ConfigError(format!(
                "worker_threads must be between 1 and {}, got {}",
                u32::MAX,
                self.worker_threads
            )));
        }
        if self.batch_size == 0 {
            return Err(MinerError::ConfigError("batch_size must be non-zero".into()));
        }
        if self.status_interval_secs == 0 || self.report_interval_secs == 0 {
            return Err(MinerError::ConfigError("intervals must be non-zero".into()));
        }

        validate_template(&self.template_bytes()?)
    }

    /// The decoded header template
    pub fn template_bytes(&self) -> Result<Vec<u8>, MinerError> {
        hex::decode(self.pool.template.trim())
            .map_err(|e| MinerError::ConfigError(format!("Invalid template hex: {}", e)))
    }

    /// Per-worker status interval
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }

    /// Statistics summary interval
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration template. The
    /// template header is all zeros, which is enough for local testing.
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# getwork miner configuration\n\n");
        template.push_str("# Number of worker threads (also the nonce stride)\n");
        template.push_str(&format!("worker_threads = {}\n", default_worker_threads()));
        template.push_str("# Nonces per search batch\n");
        template.push_str(&format!("batch_size = {}\n", default_batch_size()));
        template.push_str("# Seconds between per-worker status lines (debug level)\n");
        template.push_str(&format!("status_interval_secs = {}\n", default_status_interval()));
        template.push_str("# Seconds between statistics summaries\n");
        template.push_str(&format!("report_interval_secs = {}\n\n", default_report_interval()));

        template.push_str("[pool]\n");
        template.push_str("# Hex-encoded 80-byte block header; the last 4 bytes are the nonce\n");
        template.push_str(&format!("template = \"{}\"\n", "00".repeat(80)));
        template.push_str(&format!("worker_name = \"{}\"\n", default_worker_name()));

        template
    }
}
