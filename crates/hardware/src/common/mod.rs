//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Address Decomposition:** Tag, set index and block offset extraction.
//! 2. **Error Handling:** Fatal simulator errors and recoverable trace-line errors.
//! 3. **Logical Time:** The recency clock shared by all cache levels.

/// Address decomposition (tag / set index / block offset).
pub mod addr;

/// Error types.
pub mod error;

pub use error::{SimError, TraceParseError};

/// Logical timestamp used to order accesses for LRU decisions.
///
/// One counter per run, advanced once per accepted trace operation.
pub type LogicalTime = u64;
