// src/miner/scheduler.rs
//! Mining job scheduler implementation
//!
//! Holds the current job, spawns one worker thread per nonce partition and
//! owns the stop flag the workers poll between batches.

use crate::miner::algorithm::{Algorithm, Sha256d};
use crate::miner::share::Share;
use crate::miner::work::WorkUnit;
use crate::miner::worker::Worker;
use crate::utils::error::MinerError;
use arc_swap::ArcSwap;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

/// A header template ready to be searched
pub struct MiningJob<A: Algorithm = Sha256d> {
    /// Increases every time the template changes
    pub job_id: u64,
    /// Pristine unit for the template; workers search clones of it
    pub unit: WorkUnit<A>,
}

/// Coordinates mining jobs across worker threads
pub struct Scheduler<A: Algorithm = Sha256d> {
    /// Current active job (atomically swappable)
    current_job: Arc<ArcSwap<Option<MiningJob<A>>>>,
    /// Source of job ids
    next_job_id: AtomicU64,
    /// Engine cloned into every job's base unit
    engine: A,
    /// Channel for sending found shares
    share_sender: Sender<Share>,
    /// Channel for per-batch hash counts
    hash_sender: Sender<u64>,
    /// Flag to control worker threads
    active: Arc<AtomicBool>,
    /// Number of nonces each worker processes per batch
    batch_size: u32,
    /// How often workers log their status line
    status_interval: Duration,
}

impl Scheduler<Sha256d> {
    /// Creates a scheduler hashing with double SHA-256
    ///
    /// # Arguments
    /// * `share_sender` - Channel for sending found shares
    /// * `hash_sender` - Channel receiving the size of every finished batch
    /// * `batch_size` - Number of nonces each worker processes at once
    /// * `status_interval` - How often each worker logs its status
    pub fn new(
        share_sender: Sender<Share>,
        hash_sender: Sender<u64>,
        batch_size: u32,
        status_interval: Duration,
    ) -> Self {
        Self::with_algorithm(Sha256d::new(), share_sender, hash_sender, batch_size, status_interval)
    }
}

impl<A: Algorithm + Clone + 'static> Scheduler<A> {
    /// Creates a scheduler hashing with `engine`
    pub fn with_algorithm(
        engine: A,
        share_sender: Sender<Share>,
        hash_sender: Sender<u64>,
        batch_size: u32,
        status_interval: Duration,
    ) -> Self {
        Scheduler {
            current_job: Arc::new(ArcSwap::from_pointee(None)),
            next_job_id: AtomicU64::new(0),
            engine,
            share_sender,
            hash_sender,
            active: Arc::new(AtomicBool::new(true)),
            batch_size,
            status_interval,
        }
    }

    /// Replaces the current job with a new template
    ///
    /// Workers notice the change between batches, drop their stale units and
    /// restart from their own offset on the new template.
    ///
    /// # Returns
    /// The id assigned to the new job.
    ///
    /// # Errors
    /// Returns `MinerError::TemplateError` if the template is unusable; the
    /// current job is kept in that case.
    pub fn update_job(&self, template: Vec<u8>) -> Result<u64, MinerError> {
        let unit = WorkUnit::with_algorithm(template, self.engine.clone())?;
        let job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst) + 1;

        self.current_job.store(Arc::new(Some(MiningJob { job_id, unit })));
        log::info!("New job {} loaded", job_id);
        Ok(job_id)
    }

    /// Id of the current job, if one has been loaded
    pub fn current_job_id(&self) -> Option<u64> {
        let job = self.current_job.load_full();
        Option::as_ref(&job).map(|job| job.job_id)
    }

    /// Starts the mining process
    ///
    /// Worker `i` starts at nonce `i` and advances by `workers`, so the
    /// workers walk disjoint residues of the nonce space.
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads to spawn
    ///
    /// # Errors
    /// `MinerError::ConfigError` if `workers` is zero or does not fit a 32-bit
    /// stride; nothing is spawned in that case.
    pub fn start_mining(&self, workers: usize) -> Result<Vec<JoinHandle<()>>, MinerError> {
        let stride = u32::try_from(workers)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| {
                MinerError::ConfigError(format!("Invalid worker count: {}", workers))
            })?;

        self.spawn_workers(stride, |name, worker| {
            std::thread::Builder::new()
                .name(name)
                .spawn(move || worker.run())
        })
    }

    /// Spawns `stride` workers through `spawn`
    ///
    /// If any spawn fails the stop flag is cleared, so workers already running
    /// exit after their current batch.
    fn spawn_workers<S>(
        &self,
        stride: u32,
        mut spawn: S,
    ) -> Result<Vec<JoinHandle<()>>, MinerError>
    where
        S: FnMut(String, Worker<A>) -> std::io::Result<JoinHandle<()>>,
    {
        self.active.store(true, Ordering::SeqCst);

        let mut handles = Vec::with_capacity(stride as usize);
        for index in 0..stride {
            let worker = Worker::new(
                index,
                stride,
                self.batch_size,
                self.status_interval,
                self.current_job.clone(),
                self.active.clone(),
                self.share_sender.clone(),
                self.hash_sender.clone(),
            );

            match spawn(format!("miner-{}", index), worker) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.stop();
                    log::error!("Failed to spawn worker {}: {}", index, e);
                    return Err(e.into());
                }
            }
        }
        Ok(handles)
    }

    /// Stops all mining workers
    ///
    /// Workers finish their current batch before exiting.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Whether workers are allowed to keep running
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}
