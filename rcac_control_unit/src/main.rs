//! # RCAC Control Unit
//!
//! Loads the axis hyperparameters from a single TOML file, performs RT
//! setup and runs the regressor pipeline at the configured cycle rate on
//! synthetic closed-loop signals.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use rcac_common::prelude::*;
use rcac_control_unit::config::{LoadedConfig, load_config};
use rcac_control_unit::cycle::{CycleRunner, rt_setup};
use rcac_control_unit::debug_log::DebugLogger;
use rcac_control_unit::source::SyntheticSource;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// RCAC Control Unit — per-axis regressor pipeline
#[derive(Parser, Debug)]
#[command(name = "rcac_control_unit")]
#[command(version)]
#[command(about = "Per-axis RCAC history and regressor loop")]
struct Args {
    /// Path to the RCAC configuration TOML.
    #[arg(default_value = "config/rcac.toml")]
    config: PathBuf,

    /// Stop after N cycles (overrides `cycle.max_ticks`; 0 = forever).
    #[arg(long)]
    ticks: Option<u64>,

    /// CPU core to pin the RT thread to (default: 1).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (default: 80).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Append textual debug lines to this file.
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Config errors are reported after tracing is up, at the default level.
    let loaded = load_config(&args.config);
    let config_level: Option<Level> = loaded.as_ref().ok().map(|c| c.shared.log_level.into());
    setup_tracing(&args, config_level);

    info!("RCAC Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));

    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("RCAC Control Unit shutdown complete");
}

fn run(args: &Args, config: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, cycle_time={}µs, axes={}",
        config.shared.service_name,
        config.cycle.cycle_time_us,
        config.axes.len(),
    );

    // RT setup (mlockall, affinity, scheduler).
    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let debug_log = match &args.debug_log {
        Some(path) => DebugLogger::open_path(path),
        None => DebugLogger::closed(),
    };

    let source = SyntheticSource::new(config.cycle.cycle_time_us);
    let mut runner = CycleRunner::new(&config, source, debug_log, running);
    if let Some(ticks) = args.ticks {
        runner.set_max_ticks(ticks);
    }
    info!("CycleRunner initialized, entering loop");

    runner.run()?;

    for (axis, name) in AXIS_NAMES.iter().enumerate() {
        let history_length = runner
            .controller
            .hyperparameters(axis)
            .map_or(0, |hp| hp.history_length);
        info!(
            axis = *name,
            history_length,
            iteration = runner.controller.iteration(axis).unwrap_or(0),
            faults = ?runner.controller.faults(axis),
            "final axis state"
        );
    }
    Ok(())
}

/// Setup tracing subscriber: `--verbose` wins, then the configured level.
fn setup_tracing(args: &Args, config_level: Option<Level>) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config_level.unwrap_or(Level::INFO)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
