// src/miner/worker.rs
//! Worker thread implementation
//!
//! A worker owns one [`WorkUnit`] at a time and drives [`search`] over it in
//! batches. Everything that is not hashing (stop flag, job changes, status
//! logging) happens between batches, never inside one.

use crate::miner::algorithm::Algorithm;
use crate::miner::scheduler::MiningJob;
use crate::miner::search::{next_nonce, search};
use crate::miner::share::Share;
use crate::miner::work::WorkUnit;
use crate::stats::RateReporter;
use crate::utils::error::MinerError;
use arc_swap::ArcSwap;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Worker thread that searches one partition of the nonce space
pub struct Worker<A: Algorithm> {
    /// Worker index, also its starting nonce
    index: u32,
    /// Step between nonces, equal to the worker count
    stride: u32,
    batch_size: u32,
    status_interval: Duration,
    current_job: Arc<ArcSwap<Option<MiningJob<A>>>>,
    active: Arc<AtomicBool>,
    share_sender: Sender<Share>,
    hash_sender: Sender<u64>,
}

impl<A: Algorithm + Clone> Worker<A> {
    /// Creates a new Worker instance
    ///
    /// # Arguments
    /// * `index` - Worker index; the first nonce this worker tries
    /// * `stride` - Total number of workers
    /// * `batch_size` - Nonces per `search` call
    /// * `status_interval` - How often to log the status line
    /// * `current_job` - Job slot shared with the scheduler
    /// * `active` - Stop flag shared with the scheduler
    /// * `share_sender` - Channel for found shares
    /// * `hash_sender` - Channel for per-batch hash counts
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: u32,
        stride: u32,
        batch_size: u32,
        status_interval: Duration,
        current_job: Arc<ArcSwap<Option<MiningJob<A>>>>,
        active: Arc<AtomicBool>,
        share_sender: Sender<Share>,
        hash_sender: Sender<u64>,
    ) -> Self {
        Worker {
            index,
            stride,
            batch_size,
            status_interval,
            current_job,
            active,
            share_sender,
            hash_sender,
        }
    }

    /// Runs until the stop flag clears or a channel closes
    pub fn run(self) {
        if let Err(e) = self.mine() {
            log::error!("Worker {} stopped: {}", self.index, e);
        }
    }

    fn mine(&self) -> Result<(), MinerError> {
        let mut current: Option<(u64, WorkUnit<A>)> = None;
        let mut nonce = self.index;
        let mut reporter = RateReporter::new();
        let mut next_status = Instant::now() + self.status_interval;
        let mut hashes_since_status = 0u64;

        while self.active.load(Ordering::Relaxed) {
            let job = self.current_job.load_full();
            let Some(job) = Option::as_ref(&job) else {
                std::thread::sleep(Duration::from_millis(100));
                continue;
            };

            if current.as_ref().is_some_and(|(job_id, _)| *job_id != job.job_id) {
                if let Some((job_id, mut stale)) = current.take() {
                    stale.mark_stale();
                    log::debug!(
                        "Worker {} dropping job {} after {:?}",
                        self.index,
                        job_id,
                        stale.age()
                    );
                }
            }
            let (_, unit) = current.get_or_insert_with(|| {
                nonce = self.index;
                (job.job_id, self.fresh_unit(job))
            });

            let found = search(unit, &mut nonce, self.batch_size, self.stride)?;
            let hashed = unit.last_attempts() as u64;
            hashes_since_status += hashed;
            self.hash_sender
                .send(hashed)
                .map_err(|e| MinerError::ChannelError(format!("Hash count send failed: {}", e)))?;

            if found {
                unit.set_final_nonce(nonce);
                unit.calculate_share();
                let share = unit.share()?;
                log::info!("Worker {} found share at nonce {:08x}", self.index, nonce);
                self.share_sender.send(share)?;
            }

            // Report before a found unit is replaced; it still holds the hit
            let now = Instant::now();
            if now >= next_status {
                let last = unit.nonce();
                log::debug!("{}", reporter.report(unit, last, hashes_since_status));
                hashes_since_status = 0;
                next_status = now + self.status_interval;
            }

            if found {
                *unit = self.fresh_unit(job);
                nonce = next_nonce(nonce, self.stride);
            }
        }

        Ok(())
    }

    fn fresh_unit(&self, job: &MiningJob<A>) -> WorkUnit<A> {
        let mut unit = job.unit.clone();
        unit.set_worker_id(self.index as usize);
        unit
    }
}
