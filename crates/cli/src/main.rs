//! Cache hierarchy simulator CLI.
//!
//! This binary runs one trace through the simulator. It performs:
//! 1. **Configuration:** Built-in defaults, then an optional JSON file, then command-line flags.
//! 2. **Simulation:** Every trace operation through L1-I / L1-D / L2, narrated on stdout.
//! 3. **Reporting:** Per-level hit/miss/eviction counts on stdout and one dump file per level.
//!
//! Exits with status 1 on a missing trace flag, bad arguments or any fatal simulator error.

mod args;

use std::process;

use cachesim_core::Config;
use cachesim_core::Simulator;
use cachesim_core::common::SimError;
use cachesim_core::memory::FileBackedMemory;
use cachesim_core::sim::loader;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, USAGE};

fn main() {
    let cli = match Cli::try_parse_from(args::normalize(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let Some(trace) = cli.trace.clone() else {
        eprintln!("{USAGE}");
        process::exit(1);
    };

    init_logging(cli.quiet);

    if let Err(e) = run(&cli, &trace) {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Builds the configuration, runs the trace, prints the report and writes the dumps.
fn run(cli: &Cli, trace: &std::path::Path) -> Result<(), SimError> {
    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;
    debug!(?config, "effective configuration");

    let memory = FileBackedMemory::new(config.memory.ram_path.clone());
    debug!(ram = %memory.path().display(), "backing store");
    let mut sim = Simulator::new(&config, memory)?;
    let summary = sim.run_file(trace)?;

    println!();
    print!("{}", summary.stats);
    sim.dump(&config.output)
}

/// Installs the narration subscriber: plain lines on stdout, `RUST_LOG` taking precedence.
fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .init();
}
