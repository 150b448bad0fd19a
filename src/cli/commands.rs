// src/cli/commands.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// getwork share miner - multi-threaded double SHA-256 nonce search
#[derive(Parser, Debug)]
#[command(name = "getwork-miner")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (mine, benchmark, or generate config)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the miner application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Mine on the configured template
    Start(StartOptions),

    /// Measure hashing throughput on an all-zero header
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for starting the mining operation
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Number of worker threads to use (overrides config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Nonces per search batch (overrides config)
    #[arg(short, long)]
    pub batch_size: Option<u32>,

    /// Stop after this many seconds instead of running until killed
    #[arg(short, long)]
    pub duration: Option<u64>,
}

/// Options for running the benchmark
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Duration of benchmark in seconds
    #[arg(short, long, default_value_t = 30)]
    pub duration: u64,

    /// Number of threads to use
    #[arg(short, long, default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Nonces per search batch
    #[arg(short, long, default_value_t = 100_000)]
    pub batch_size: u32,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_overrides() {
        let cli = Commands::try_parse_from([
            "getwork-miner",
            "start",
            "--config",
            "miner.toml",
            "-w",
            "4",
            "--batch-size",
            "5000",
        ])
        .unwrap();

        match cli.action {
            Action::Start(opts) => {
                assert_eq!(opts.config, PathBuf::from("miner.toml"));
                assert_eq!(opts.workers, Some(4));
                assert_eq!(opts.batch_size, Some(5000));
                assert_eq!(opts.duration, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_benchmark_defaults() {
        let cli = Commands::try_parse_from(["getwork-miner", "benchmark"]).unwrap();

        match cli.action {
            Action::Benchmark(opts) => {
                assert_eq!(opts.duration, 30);
                assert_eq!(opts.batch_size, 100_000);
                assert!(opts.threads > 0);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Commands::command().debug_assert();
    }
}
