// src/main.rs
use clap::Parser;
use crossbeam_channel::{RecvTimeoutError, unbounded};
use getwork_miner_rs::cli::{Action, BenchmarkOptions, ConfigOptions, StartOptions};
use getwork_miner_rs::stats::format_hashrate;
use getwork_miner_rs::utils::init_bench_logging;
use getwork_miner_rs::*;
use std::time::{Duration, Instant};

/// Main entry point for the miner
///
/// Parses the command line and delegates to the subcommand handler; any
/// error is propagated out of `main`.
fn main() -> Result<(), MinerError> {
    let cli = Commands::parse();

    match cli.action {
        Action::Start(opts) => start_mining(opts),
        Action::Benchmark(opts) => run_benchmark(opts),
        Action::Config(opts) => generate_config(opts),
    }
}

/// Mining run parameters after config and CLI overrides are merged
struct RunOptions {
    workers: usize,
    batch_size: u32,
    status_interval: Duration,
    duration: Option<Duration>,
}

/// Starts mining on the configured template
///
/// # Operations
/// 1. Initializes logging
/// 2. Loads the configuration and applies CLI overrides
/// 3. Serves the template from an in-process pool
/// 4. Runs the workers until the optional duration elapses
fn start_mining(opts: StartOptions) -> Result<(), MinerError> {
    init_logging();

    let mut config = config::load(&opts.config)?;
    if let Some(workers) = opts.workers {
        config.worker_threads = workers;
    }
    if let Some(batch_size) = opts.batch_size {
        config.batch_size = batch_size;
    }
    config.validate()?;

    let pool = LocalPool::new(config.template_bytes()?)?;
    log::info!(
        "{}: mining with {} workers, batch size {}",
        config.pool.worker_name,
        config.worker_threads,
        config.batch_size
    );

    let reporter = StatsReporter::new(config.report_interval());
    let stats = run_miner(
        &pool,
        &reporter,
        RunOptions {
            workers: config.worker_threads,
            batch_size: config.batch_size,
            status_interval: config.status_interval(),
            duration: opts.duration.map(Duration::from_secs),
        },
    )?;

    log::info!(
        "Finished after {:?}: {} hashes, {} accepted / {} rejected",
        stats.uptime,
        stats.hashes_total,
        stats.shares_accepted,
        stats.shares_rejected
    );
    Ok(())
}

/// Runs a fixed-length benchmark on an all-zero header
fn run_benchmark(opts: BenchmarkOptions) -> Result<(), MinerError> {
    init_bench_logging();

    log::info!(
        "Starting benchmark: {} threads, batch size {}, {} seconds",
        opts.threads,
        opts.batch_size,
        opts.duration
    );

    let pool = LocalPool::new(vec![0u8; 80])?;
    let reporter = StatsReporter::new(Duration::from_secs(5));
    let stats = run_miner(
        &pool,
        &reporter,
        RunOptions {
            workers: opts.threads,
            batch_size: opts.batch_size,
            status_interval: Duration::from_secs(5),
            duration: Some(Duration::from_secs(opts.duration)),
        },
    )?;

    log::info!("Benchmark results:");
    log::info!("Total hashes: {}", stats.hashes_total);
    log::info!("Average hashrate: {}", format_hashrate(stats.avg_hashrate));

    let hw = reporter.get_hardware_stats();
    log::info!(
        "CPU: {:.1}% | Memory: {} MiB | Temp: {:.1}°C",
        hw.cpu_usage,
        hw.memory_used / (1024 * 1024),
        hw.temperature
    );
    log::logger().flush();

    Ok(())
}

/// Writes a commented configuration template
fn generate_config(opts: ConfigOptions) -> Result<(), MinerError> {
    std::fs::write(&opts.output, config::generate_template())?;
    println!("Configuration template written to {}", opts.output.display());
    Ok(())
}

/// Mines on the pool's current template and submits every share found
///
/// Shares are submitted from this thread, so workers never block on the
/// pool. Returns the final statistics once the workers have stopped.
fn run_miner(
    pool: &dyn Pool,
    reporter: &StatsReporter,
    opts: RunOptions,
) -> Result<MiningStats, MinerError> {
    reporter.start_reporting();

    let (share_sender, share_receiver) = unbounded();
    let scheduler = Scheduler::new(
        share_sender,
        reporter.hash_sender(),
        opts.batch_size,
        opts.status_interval,
    );
    scheduler.update_job(pool.fetch_template()?)?;
    let handles = scheduler.start_mining(opts.workers)?;

    let deadline = opts.duration.map(|d| Instant::now() + d);
    while deadline.is_none_or(|d| Instant::now() < d) {
        match share_receiver.recv_timeout(Duration::from_millis(250)) {
            Ok(share) => reporter.record_share(share.submit(pool).into()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    scheduler.stop();
    for handle in handles {
        handle
            .join()
            .map_err(|_| MinerError::ChannelError("Worker thread panicked".into()))?;
    }

    Ok(reporter.get_stats())
}
