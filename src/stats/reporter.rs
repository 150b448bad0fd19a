// src/stats/reporter.rs
//! Totals across all workers and the periodic summary line

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use sysinfo::{Components, System};

/// Aggregate mining statistics across all workers
#[derive(Debug, Clone, Default)]
pub struct MiningStats {
    /// Total number of hashes computed
    pub hashes_total: u64,
    /// Number of shares accepted by the pool
    pub shares_accepted: u64,
    /// Number of shares rejected by the pool
    pub shares_rejected: u64,
    /// Average hashrate since the reporter started (hashes per second)
    pub avg_hashrate: f64,
    /// Time since the reporter started
    pub uptime: Duration,
}

/// Statistics related to hardware performance
#[derive(Debug, Clone)]
pub struct HardwareStats {
    /// Current CPU usage percentage (0-100)
    pub cpu_usage: f32,
    /// Memory currently in use (in bytes)
    pub memory_used: u64,
    /// Current CPU temperature in Celsius, 0 if no sensor reports one
    pub temperature: f32,
}

impl HardwareStats {
    /// Refreshes `system` and `components` and reads the current values
    fn sample(system: &mut System, components: &mut Components) -> Self {
        system.refresh_cpu_all();
        system.refresh_memory();
        components.refresh(true);

        let cpus = system.cpus();
        let cpu_usage = match cpus.len() {
            0 => 0.0,
            n => cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / n as f32,
        };
        let temperature = components
            .iter()
            .filter(|c| c.label().contains("CPU"))
            .find_map(|c| c.temperature())
            .unwrap_or(0.0);

        HardwareStats {
            cpu_usage,
            memory_used: system.used_memory(),
            temperature,
        }
    }
}

/// Running totals shared by the reporter and its listener threads
struct Counters {
    hashes: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
    started: Instant,
}

impl Counters {
    fn new() -> Self {
        Counters {
            hashes: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    fn add_hashes(&self, count: u64) {
        self.hashes.fetch_add(count, Ordering::Relaxed);
    }

    fn record_share(&self, result: ShareResult) {
        let counter = match result {
            ShareResult::Accepted => &self.accepted,
            ShareResult::Rejected => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> MiningStats {
        let uptime = self.started.elapsed();
        let hashes_total = self.hashes.load(Ordering::Relaxed);

        MiningStats {
            hashes_total,
            shares_accepted: self.accepted.load(Ordering::Relaxed),
            shares_rejected: self.rejected.load(Ordering::Relaxed),
            avg_hashrate: hashes_total as f64 / uptime.as_secs_f64().max(1e-6),
            uptime,
        }
    }
}

/// Collects and reports mining and hardware statistics
///
/// Workers feed hash counts through [`hash_sender`](Self::hash_sender) and
/// the share submitter calls [`record_share`](Self::record_share). Cloning is cheap: clones share the
/// same totals.
#[derive(Clone)]
pub struct StatsReporter {
    counters: Arc<Counters>,
    report_interval: Duration,
}

impl StatsReporter {
    /// Creates a reporter whose totals start at zero now
    ///
    /// # Arguments
    /// * `report_interval` - How often `start_reporting` logs a summary
    pub fn new(report_interval: Duration) -> Self {
        StatsReporter {
            counters: Arc::new(Counters::new()),
            report_interval,
        }
    }

    /// Creates a channel sender for hash counts
    ///
    /// Workers send the number of candidates hashed by every finished batch.
    /// A background listener thread adds them up and exits once every sender
    /// is dropped.
    pub fn hash_sender(&self) -> Sender<u64> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let counters = self.counters.clone();

        std::thread::spawn(move || {
            for count in rx {
                counters.add_hashes(count);
            }
        });
        tx
    }

    /// Records the pool's verdict on a submitted share
    pub fn record_share(&self, result: ShareResult) {
        self.counters.record_share(result);
    }

    /// Gets a snapshot of the current mining statistics
    pub fn get_stats(&self) -> MiningStats {
        self.counters.snapshot()
    }

    /// Reads CPU, memory and sensor values for this host
    pub fn get_hardware_stats(&self) -> HardwareStats {
        HardwareStats::sample(&mut System::new(), &mut Components::new_with_refreshed_list())
    }

    /// Starts logging a summary every `report_interval` on a background thread
    pub fn start_reporting(&self) {
        let counters = self.counters.clone();
        let interval = self.report_interval;

        std::thread::spawn(move || {
            let mut system = System::new();
            let mut components = Components::new_with_refreshed_list();
            loop {
                std::thread::sleep(interval);
                let stats = counters.snapshot();
                let hw = HardwareStats::sample(&mut system, &mut components);

                log::info!(
                    "Hashrate: {} | Accepted/Rejected: {}/{} | CPU: {:.1}% | Temp: {:.1}°C",
                    format_hashrate(stats.avg_hashrate),
                    stats.shares_accepted,
                    stats.shares_rejected,
                    hw.cpu_usage,
                    hw.temperature
                );
            }
        });
    }
}

/// Result of submitting a share to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareResult {
    /// The share was accepted as valid
    Accepted,
    /// The share was rejected
    Rejected,
}

impl From<bool> for ShareResult {
    fn from(accepted: bool) -> Self {
        if accepted {
            ShareResult::Accepted
        } else {
            ShareResult::Rejected
        }
    }
}

/// Formats a hash rate with an SI prefix, e.g. `12.34 MH/s`
pub fn format_hashrate(rate: f64) -> String {
    const UNITS: [&str; 5] = ["H/s", "kH/s", "MH/s", "GH/s", "TH/s"];

    let mut value = rate;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_hash_counts_are_summed() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let sender = reporter.hash_sender();

        sender.send(1_000).unwrap();
        sender.send(500).unwrap();

        assert!(wait_for(|| reporter.get_stats().hashes_total == 1_500));
    }

    #[test]
    fn test_share_results_are_counted() {
        let reporter = StatsReporter::new(Duration::from_secs(60));

        reporter.record_share(ShareResult::Accepted);
        reporter.record_share(true.into());
        reporter.record_share(false.into());

        let stats = reporter.get_stats();
        assert_eq!(stats.shares_accepted, 2);
        assert_eq!(stats.shares_rejected, 1);
    }

    #[test]
    fn test_hardware_stats_are_in_range() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let hw = reporter.get_hardware_stats();

        assert!((0.0..=100.0).contains(&hw.cpu_usage));
        assert!(hw.memory_used > 0);
    }

    #[test]
    fn test_clones_share_totals() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let clone = reporter.clone();

        clone.record_share(ShareResult::Accepted);

        assert_eq!(reporter.get_stats().shares_accepted, 1);
    }

    #[test]
    fn test_format_hashrate() {
        assert_eq!(format_hashrate(12.0), "12.00 H/s");
        assert_eq!(format_hashrate(1_000.0), "1.00 kH/s");
        assert_eq!(format_hashrate(2_500_000.0), "2.50 MH/s");
        assert_eq!(format_hashrate(1e15), "1000.00 TH/s");
    }
}
