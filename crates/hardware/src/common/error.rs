//! Error definitions.
//!
//! This module defines the two error families of the simulator:
//! 1. **Fatal errors (`SimError`):** Bad geometry or configuration, unreadable trace,
//!    backing-store failures and unwritable dump files. These abort the run.
//! 2. **Per-line errors (`TraceParseError`):** A trace line that does not decode into a
//!    recognised operation. These are recoverable; the line is skipped.
//!
//! Cache lookups themselves are total and never produce an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal simulator error. Any of these terminates the run without writing cache dumps.
#[derive(Debug, Error)]
pub enum SimError {
    /// A cache level was configured with an unusable geometry.
    #[error("invalid {level} geometry: {reason}")]
    InvalidGeometry {
        /// Cache level name (`"L1"` or `"L2"`).
        level: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// The JSON configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An input file (trace or configuration) could not be opened or read.
    #[error("could not read '{}': {source}", .path.display())]
    Input {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backing store could not supply a block.
    #[error("backing store read of {len} bytes at {addr:#010x} failed: {source}")]
    BackingStore {
        /// Block-aligned address of the failed read.
        addr: u32,
        /// Requested block length in bytes.
        len: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A cache dump file could not be written.
    #[error("could not write cache dump '{}': {source}", .path.display())]
    Dump {
        /// Path of the dump file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Reason a trace line was not accepted as an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceParseError {
    /// The line is empty or whitespace only.
    #[error("blank line")]
    Empty,

    /// The operation letter is not one of `I`, `L`, `S`, `M`.
    #[error("unknown operation '{0}'")]
    UnknownOp(char),

    /// A required field (address or size) is absent.
    #[error("missing {0} field")]
    MissingField(&'static str),

    /// The address is not a 32-bit hexadecimal number.
    #[error("bad address '{0}'")]
    BadAddress(String),

    /// The size is not an unsigned decimal number.
    #[error("bad size '{0}'")]
    BadSize(String),
}
