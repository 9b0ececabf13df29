//! Two-level cache hierarchy simulator library.
//!
//! This crate simulates split L1 instruction/data caches backed by a unified L2,
//! driven by a memory-access trace:
//! 1. **Cache:** Set-associative storage, hit/miss lookup, LRU fills (invalid line first) and dumps.
//! 2. **Dispatch:** Per-operation protocol for fetches, loads, stores (write-no-allocate) and modifies.
//! 3. **Memory:** The backing store blocks are filled from, as an injectable `BlockSource`.
//! 4. **Trace:** Parsing of `<op> <hex-address>,<size>[,<data>]` lines.
//! 5. **Simulation:** Configuration, whole-run driver and per-level statistics.

/// Set-associative cache (storage, lookup, fill, dump).
pub mod cache;
/// Common types (address decomposition, errors, logical time).
pub mod common;
/// Simulator configuration (defaults, geometry, memory and output settings).
pub mod config;
/// Backing store for cache fills.
pub mod memory;
/// Operation dispatch, run driver and input loading.
pub mod sim;
/// Per-level hit/miss/eviction statistics.
pub mod stats;
/// Trace records, parser and reader.
pub mod trace;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Cache hierarchy and dispatcher.
pub use crate::sim::Hierarchy;
/// Whole-run simulator.
pub use crate::sim::Simulator;
