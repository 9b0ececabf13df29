//! Trace reader.
//!
//! Walks a trace line by line and yields only the lines that decode into an
//! operation. Blank and malformed lines are logged at DEBUG and skipped; they
//! never reach the dispatcher and so never advance the logical clock. Bytes that
//! are not UTF-8 are replaced rather than rejected, so such a line is at worst malformed.

use std::io::BufRead;
use std::path::PathBuf;

use tracing::debug;

use super::{TraceRecord, parse_line};
use crate::common::SimError;

/// A decoded record together with its 1-based line number in the trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceLine {
    /// Line number in the source trace.
    pub line_no: usize,
    /// The decoded operation.
    pub record: TraceRecord,
}

/// Iterator over the operations of a trace.
///
/// Yields `Err` only for I/O failures of the underlying reader; after an error
/// the iterator is exhausted.
#[derive(Debug)]
pub struct TraceReader<R> {
    input: R,
    source: PathBuf,
    buf: Vec<u8>,
    line_no: usize,
    skipped: usize,
    failed: bool,
}

impl<R: BufRead> TraceReader<R> {
    /// Creates a reader over `input`.
    pub fn new(input: R) -> Self {
        Self {
            input,
            source: PathBuf::new(),
            buf: Vec::new(),
            line_no: 0,
            skipped: 0,
            failed: false,
        }
    }

    /// Names the trace (usually its file path) for error messages.
    #[must_use]
    pub fn named(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    /// Number of lines read so far, including skipped ones.
    pub const fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Number of blank or malformed lines skipped so far.
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceLine, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.input.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(source) => {
                    self.failed = true;
                    return Some(Err(SimError::Input {
                        path: self.source.clone(),
                        source,
                    }));
                }
            }
            self.line_no += 1;

            match parse_line(&String::from_utf8_lossy(&self.buf)) {
                Ok(record) => {
                    return Some(Ok(TraceLine {
                        line_no: self.line_no,
                        record,
                    }));
                }
                Err(reason) => {
                    self.skipped += 1;
                    debug!("skipping trace line {}: {reason}", self.line_no);
                }
            }
        }
    }
}
