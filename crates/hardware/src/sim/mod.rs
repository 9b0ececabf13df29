//! Simulation driver.
//!
//! Provides the per-operation dispatcher over the cache hierarchy, the whole-run
//! simulator, and helpers for opening its input files.

/// Per-operation dispatch over L1-I, L1-D and L2.
pub mod dispatch;
/// Trace and configuration file loading.
pub mod loader;
/// Whole-run driver and dump writer.
pub mod simulator;

pub use dispatch::{Hierarchy, Outcome, StoreOutcome};
pub use simulator::{RunSummary, Simulator};
