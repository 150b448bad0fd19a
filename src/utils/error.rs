// src/utils/error.rs
use crate::miner::share::Share;
use crate::types::WorkState;
use std::io;
use thiserror::Error;

/// Main error type for the mining application
///
/// Invalid input (bad templates, zero strides, closed work units) is reported
/// before the search loop starts; the hot loop itself never fails. Pool
/// outcomes are plain booleans and only show up here when the pool
/// collaborator cannot produce work at all.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Header template has an unusable length or encoding
    #[error("Invalid template: {0}")]
    TemplateError(String),

    /// A zero stride was passed to the nonce search
    #[error("Invalid stride: stride must be non-zero")]
    StrideError,

    /// Search requested on a unit in a terminal state
    #[error("Work unit is {0} and cannot be searched")]
    StateError(WorkState),

    /// Share requested before it was fully prepared
    #[error("Share not ready: {0}")]
    ShareError(String),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or payload data
    #[error("Invalid input: {0}")]
    InputError(String),

    /// The pool collaborator could not provide work
    #[error("Pool error: {0}")]
    PoolError(String),

    /// Thread communication channel errors
    #[error("Thread communication error: {0}")]
    ChannelError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Used when the share channel has no receiver left.
impl From<crossbeam_channel::SendError<Share>> for MinerError {
    fn from(e: crossbeam_channel::SendError<Share>) -> Self {
        MinerError::ChannelError(format!("Share send failed: {}", e))
    }
}

/// Hex payloads show up in templates from the config file and in encoded
/// shares coming back to the pool side.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::InputError(format!("Hex conversion failed: {}", e))
    }
}
