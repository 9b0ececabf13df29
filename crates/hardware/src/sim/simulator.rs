//! Simulator: owns the cache hierarchy and the backing store side-by-side.
//!
//! Drives a whole trace through the hierarchy and writes the end-of-run dumps.
//! A fatal error stops the run immediately; dumps are only written by an explicit
//! call after a successful run.

use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use super::dispatch::{Hierarchy, Outcome};
use super::loader;
use crate::cache::dump;
use crate::common::SimError;
use crate::config::{Config, OutputConfig};
use crate::memory::BlockSource;
use crate::stats::HierarchyStats;
use crate::trace::{TraceReader, TraceRecord};

/// Totals of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Operations executed (equals the clock at the end of the run).
    pub operations: u64,
    /// Blank or malformed trace lines that were skipped.
    pub skipped_lines: usize,
    /// Final counters.
    pub stats: HierarchyStats,
}

/// Top-level simulator: cache hierarchy + backing store.
#[derive(Debug)]
pub struct Simulator<M> {
    hierarchy: Hierarchy,
    memory: M,
}

impl<M: BlockSource> Simulator<M> {
    /// Creates a simulator with an empty hierarchy built from `config`.
    ///
    /// # Returns
    ///
    /// `SimError::InvalidGeometry` if the configuration is unusable.
    pub fn new(config: &Config, memory: M) -> Result<Self, SimError> {
        Ok(Self {
            hierarchy: Hierarchy::new(config)?,
            memory,
        })
    }

    /// The cache hierarchy.
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &HierarchyStats {
        self.hierarchy.stats()
    }

    /// The backing store.
    pub const fn memory(&self) -> &M {
        &self.memory
    }

    /// Executes a single operation.
    pub fn step(&mut self, record: &TraceRecord) -> Result<Outcome, SimError> {
        self.hierarchy.execute(record, &mut self.memory)
    }

    /// Runs every operation of `input` in order.
    ///
    /// # Arguments
    ///
    /// * `input` - Buffered trace text.
    ///
    /// # Returns
    ///
    /// Totals for the run, or the first fatal error.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<RunSummary, SimError> {
        self.run_reader(TraceReader::new(input))
    }

    /// Runs the trace file at `path`.
    ///
    /// # Returns
    ///
    /// Totals for the run, `SimError::Input` if the file cannot be read, or the
    /// first fatal error of the run.
    pub fn run_file(&mut self, path: &Path) -> Result<RunSummary, SimError> {
        self.run_reader(loader::open_trace(path)?)
    }

    fn run_reader<R: BufRead>(&mut self, mut reader: TraceReader<R>) -> Result<RunSummary, SimError> {
        let start = self.hierarchy.clock();
        for line in reader.by_ref() {
            let line = line?;
            let _ = self.step(&line.record)?;
        }
        let summary = RunSummary {
            operations: self.hierarchy.clock() - start,
            skipped_lines: reader.skipped(),
            stats: *self.hierarchy.stats(),
        };
        debug!(
            "trace finished: {} lines, {} operations, {} skipped",
            reader.lines_read(),
            summary.operations,
            summary.skipped_lines
        );
        Ok(summary)
    }

    /// Writes the L1I, L1D and L2 dumps to the files named by `output`.
    pub fn dump(&self, output: &OutputConfig) -> Result<(), SimError> {
        for (cache, path) in self.hierarchy.caches().into_iter().zip(output.paths()) {
            dump::dump_to_file(cache, &path)?;
            debug!("wrote {} dump to {}", cache.name(), path.display());
        }
        Ok(())
    }

    /// Splits the simulator into its hierarchy and backing store.
    pub fn into_parts(self) -> (Hierarchy, M) {
        (self.hierarchy, self.memory)
    }
}
