//! Command-line arguments.
//!
//! Geometry flags are traditionally spelled with a single dash (`-L1s 2`). clap only
//! accepts long flags with two dashes, so [`normalize`] rewrites the single-dash
//! spellings before parsing. Both forms are accepted.

use std::ffi::OsString;
use std::path::PathBuf;

use cachesim_core::config::{Config, GeometryConfig};
use clap::Parser;

/// Geometry flag names that may appear with a single leading dash.
const GEOMETRY_FLAGS: [&str; 6] = ["L1s", "L1E", "L1b", "L2s", "L2E", "L2b"];

/// Usage line printed when no trace file is given.
pub const USAGE: &str =
    "Usage: cachesim -L1s <s> -L1E <E> -L1b <b> -L2s <s> -L2E <E> -L2b <b> -t <tracefile>";

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven L1/L2 cache hierarchy simulator",
    long_about = "Runs a memory-access trace through split L1 instruction/data caches backed by a \
unified L2, prints per-level hit/miss/eviction counts and writes L1I.txt, L1D.txt and L2.txt.\n\n\
Example:\n  cachesim -L1s 0 -L1E 2 -L1b 3 -L2s 1 -L2E 2 -L2b 3 -t traces/test1.trace"
)]
pub struct Cli {
    /// L1 set-index bits (2^s sets).
    #[arg(long = "L1s", value_name = "S")]
    pub l1_s: Option<u32>,

    /// L1 associativity (lines per set).
    #[arg(long = "L1E", value_name = "E")]
    pub l1_e: Option<usize>,

    /// L1 block-offset bits (2^b-byte blocks).
    #[arg(long = "L1b", value_name = "B")]
    pub l1_b: Option<u32>,

    /// L2 set-index bits (2^s sets).
    #[arg(long = "L2s", value_name = "S")]
    pub l2_s: Option<u32>,

    /// L2 associativity (lines per set).
    #[arg(long = "L2E", value_name = "E")]
    pub l2_e: Option<usize>,

    /// L2 block-offset bits (2^b-byte blocks).
    #[arg(long = "L2b", value_name = "B")]
    pub l2_b: Option<u32>,

    /// Trace file to simulate.
    #[arg(short = 't', long = "trace", value_name = "TRACEFILE")]
    pub trace: Option<PathBuf>,

    /// JSON configuration file; command-line flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RAM image blocks are read from (default: RAM.dat).
    #[arg(long)]
    pub ram: Option<PathBuf>,

    /// Directory the cache dumps are written to (default: current directory).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Suppress the per-operation narration.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Applies the command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        apply_geometry(&mut config.l1, self.l1_s, self.l1_e, self.l1_b);
        apply_geometry(&mut config.l2, self.l2_s, self.l2_e, self.l2_b);
        if let Some(ram) = &self.ram {
            config.memory.ram_path.clone_from(ram);
        }
        if let Some(dir) = &self.out_dir {
            config.output.dir.clone_from(dir);
        }
    }
}

fn apply_geometry(g: &mut GeometryConfig, s: Option<u32>, e: Option<usize>, b: Option<u32>) {
    if let Some(s) = s {
        g.set_bits = s;
    }
    if let Some(e) = e {
        g.ways = e;
    }
    if let Some(b) = b {
        g.block_bits = b;
    }
}

/// Rewrites `-L1s`-style geometry flags to `--L1s` so clap can parse them.
///
/// The first element (program name) is left untouched, as is everything after a `--`.
pub fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            let name = s.strip_prefix('-')?;
            let flag = name.split_once('=').map_or(name, |(flag, _)| flag);
            GEOMETRY_FLAGS
                .contains(&flag)
                .then(|| OsString::from(format!("--{name}")))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}
