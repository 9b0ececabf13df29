//! Input loading.
//!
//! This module opens the files a run consumes. It performs:
//! 1. **Trace opening:** Opens a trace file and wraps it in a buffered `TraceReader`.
//! 2. **Config loading:** Reads a JSON configuration file into a `Config`.
//!
//! Both map I/O failures to `SimError::Input` carrying the offending path.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::common::SimError;
use crate::config::Config;
use crate::trace::TraceReader;

/// Opens a trace file for reading.
///
/// # Arguments
///
/// * `path` - Path to the trace file.
///
/// # Returns
///
/// A reader over the file's operations, or `SimError::Input` if it cannot be opened.
pub fn open_trace(path: &Path) -> Result<TraceReader<BufReader<File>>, SimError> {
    let file = File::open(path).map_err(|source| SimError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TraceReader::new(BufReader::new(file)).named(path))
}

/// Reads and parses a JSON configuration file.
///
/// # Arguments
///
/// * `path` - Path to the JSON file.
///
/// # Returns
///
/// The configuration (not yet validated), `SimError::Input` if the file cannot be
/// read, or `SimError::Config` if it is not valid configuration JSON.
pub fn load_config(path: &Path) -> Result<Config, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_json(&text)
}
