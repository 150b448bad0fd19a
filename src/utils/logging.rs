// src/utils/logging.rs
//! Logging setup
//!
//! Everything logs through the `log` facade; the binary installs `env_logger`
//! with one line per record:
//!
//! ```text
//! [1718000000 INFO getwork_miner_rs::miner::worker:97] Worker 2 found share at nonce 0012a4f0
//! ```
//!
//! `RUST_LOG` always wins over the defaults chosen here.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initializes logging for mining runs
///
/// Defaults to `info`, which shows found shares and periodic summaries but
/// not the per-worker status lines.
pub fn init_logging() {
    init_with_default(LevelFilter::Info);
}

/// Initializes logging for benchmarks
///
/// Defaults to `debug` so per-worker status lines and local pool verdicts
/// are visible.
pub fn init_bench_logging() {
    init_with_default(LevelFilter::Debug);
}

fn init_with_default(level: LevelFilter) {
    let mut builder = base_builder();

    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(level),
    };

    // A second init (e.g. from tests) keeps the first logger
    let _ = builder.try_init();
}

fn base_builder() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.module_path().unwrap_or_default(),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}
