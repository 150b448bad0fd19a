// src/miner/work.rs
//! Work units: one header template plus a per-worker working copy
//!
//! The template is held as an `Arc<[u8]>` so every unit cloned for another
//! worker points at the same read-only bytes, while each unit owns its own
//! working buffer. Only the trailing 4-byte nonce field of the working buffer
//! is ever written after construction.

use crate::miner::algorithm::{Algorithm, Sha256d};
use crate::miner::share::{self, Share};
use crate::types::WorkState;
use crate::utils::error::MinerError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Size of the little-endian nonce field at the end of the header
pub const NONCE_LEN: usize = 4;

/// A header template being searched by one worker
pub struct WorkUnit<A: Algorithm = Sha256d> {
    /// Immutable template, shared between clones
    template: Arc<[u8]>,
    /// Working copy; bytes outside the nonce field always equal `template`
    working: Vec<u8>,
    /// Offset of the nonce field (`len - 4`)
    nonce_offset: usize,
    created_at: Instant,
    /// Nonce that produced a share, assigned by the caller
    final_nonce: Option<u32>,
    worker_id: usize,
    last_batch_size: u32,
    /// Candidates actually hashed by the most recent batch
    last_attempts: u32,
    /// Encoded submission payload, cached by `calculate_share`
    payload: Option<String>,
    state: WorkState,
    engine: A,
}

impl WorkUnit<Sha256d> {
    /// Creates a unit hashing with double SHA-256
    ///
    /// # Errors
    /// Returns `MinerError::TemplateError` if the template is shorter than the
    /// nonce field or not a whole number of 32-bit words.
    pub fn new(template: impl Into<Arc<[u8]>>) -> Result<Self, MinerError> {
        Self::with_algorithm(template, Sha256d::new())
    }
}

impl<A: Algorithm> WorkUnit<A> {
    /// Creates a unit hashing with the given engine
    ///
    /// # Arguments
    /// * `template` - Serialized header, nonce field last
    /// * `engine` - Hashing engine owned by this unit
    pub fn with_algorithm(template: impl Into<Arc<[u8]>>, engine: A) -> Result<Self, MinerError> {
        let template = template.into();
        validate_template(&template)?;

        Ok(WorkUnit {
            working: template.to_vec(),
            nonce_offset: template.len() - NONCE_LEN,
            template,
            created_at: Instant::now(),
            final_nonce: None,
            worker_id: 0,
            last_batch_size: 0,
            last_attempts: 0,
            payload: None,
            state: WorkState::Created,
            engine,
        })
    }

    /// Overwrites the nonce field of the working buffer with `nonce` (little-endian)
    #[inline]
    pub fn write_nonce(&mut self, nonce: u32) {
        self.working[self.nonce_offset..self.nonce_offset + NONCE_LEN]
            .copy_from_slice(&nonce.to_le_bytes());
        self.payload = None;
    }

    /// Reads the nonce currently stored in the working buffer
    pub fn nonce(&self) -> u32 {
        let mut bytes = [0u8; NONCE_LEN];
        bytes.copy_from_slice(&self.working[self.nonce_offset..]);
        u32::from_le_bytes(bytes)
    }

    /// Digest of the working buffer as it stands
    #[inline]
    pub fn current_digest(&mut self) -> [u8; 32] {
        self.engine.digest(&self.working)
    }

    /// Time elapsed since the unit (or the unit it was cloned from) was built
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// The shared header template
    pub fn template(&self) -> &Arc<[u8]> {
        &self.template
    }

    /// The working buffer, nonce included
    pub fn working(&self) -> &[u8] {
        &self.working
    }

    /// Offset of the nonce field in the working buffer
    pub fn nonce_offset(&self) -> usize {
        self.nonce_offset
    }

    /// When the original unit was built; clones keep it
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Nonce assigned with [`set_final_nonce`](Self::set_final_nonce)
    pub fn final_nonce(&self) -> Option<u32> {
        self.final_nonce
    }

    /// Records the nonce that produced a share
    ///
    /// The search loop leaves this to its caller: the authoritative value is
    /// the nonce `search` returned alongside `true`.
    pub fn set_final_nonce(&mut self, nonce: u32) {
        self.final_nonce = Some(nonce);
    }

    /// Owning worker, for reporting
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Tags the unit with its owning worker
    pub fn set_worker_id(&mut self, worker_id: usize) {
        self.worker_id = worker_id;
    }

    /// Size of the most recent search batch, for rate estimation only
    pub fn last_batch_size(&self) -> u32 {
        self.last_batch_size
    }

    /// Candidates hashed by the most recent batch
    ///
    /// Equal to [`last_batch_size`](Self::last_batch_size) unless the batch
    /// stopped early on a share.
    pub fn last_attempts(&self) -> u32 {
        self.last_attempts
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkState {
        self.state
    }

    /// Marks the unit as superseded by a newer template
    pub fn mark_stale(&mut self) {
        self.state = WorkState::Stale;
    }

    /// Moves the unit into `Searching` for a batch of `batch_size` nonces
    pub(crate) fn begin_batch(&mut self, batch_size: u32) -> Result<(), MinerError> {
        if self.state.is_terminal() {
            return Err(MinerError::StateError(self.state));
        }
        self.state = WorkState::Searching;
        self.last_batch_size = batch_size;
        self.last_attempts = 0;
        Ok(())
    }

    pub(crate) fn end_batch(&mut self, attempts: u32) {
        self.last_attempts = attempts;
    }

    pub(crate) fn share_found(&mut self) {
        self.state = WorkState::ShareFound;
    }

    /// Encodes the working buffer into the submission payload
    ///
    /// The payload is cached, so repeated calls (and the later [`share`]) do
    /// not re-encode. Writing a new nonce drops the cache.
    ///
    /// [`share`]: WorkUnit::share
    pub fn calculate_share(&mut self) -> &str {
        self.payload
            .get_or_insert_with(|| share::encode(&self.working))
            .as_str()
    }

    /// Cached payload, if `calculate_share` has run since the last nonce write
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Packages the found share for submission
    ///
    /// # Errors
    /// Returns `MinerError::ShareError` if no final nonce was assigned or the
    /// payload has not been calculated.
    pub fn share(&self) -> Result<Share, MinerError> {
        let nonce = self
            .final_nonce
            .ok_or_else(|| MinerError::ShareError("final nonce not set".into()))?;
        let payload = self
            .payload
            .clone()
            .ok_or_else(|| MinerError::ShareError("payload not calculated".into()))?;

        Ok(Share {
            worker_id: self.worker_id,
            nonce,
            payload,
        })
    }
}

/// Shares the template and deep-copies the working buffer.
///
/// Share bookkeeping (final nonce, cached payload) belongs to the unit that
/// found the share and is not carried over.
impl<A: Algorithm + Clone> Clone for WorkUnit<A> {
    fn clone(&self) -> Self {
        WorkUnit {
            template: Arc::clone(&self.template),
            working: self.working.clone(),
            nonce_offset: self.nonce_offset,
            created_at: self.created_at,
            final_nonce: None,
            worker_id: self.worker_id,
            last_batch_size: self.last_batch_size,
            last_attempts: self.last_attempts,
            payload: None,
            state: self.state,
            engine: self.engine.clone(),
        }
    }
}

impl<A: Algorithm> std::fmt::Debug for WorkUnit<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkUnit")
            .field("worker_id", &self.worker_id)
            .field("state", &self.state)
            .field("working", &hex::encode(&self.working))
            .field("final_nonce", &self.final_nonce)
            .finish()
    }
}

/// Checks that a template can carry a nonce and be flipped word by word.
pub fn validate_template(template: &[u8]) -> Result<(), MinerError> {
    if template.len() < NONCE_LEN || template.len() % 4 != 0 {
        return Err(MinerError::TemplateError(format!(
            "length {} is not a non-empty multiple of 4 bytes",
            template.len()
        )));
    }
    Ok(())
}
