//! Memory-access traces.
//!
//! This module decodes the textual trace that drives a simulation. It provides:
//! 1. **Records:** `TraceOp` and `TraceRecord`, one decoded operation per line.
//! 2. **Parsing:** `parse_line` for a single line of the form
//!    `<op> <hex-address>,<size>[,<data>]` with `op` one of `I`, `L`, `S`, `M`.
//! 3. **Reading:** `TraceReader`, which walks a `BufRead` and skips lines that
//!    do not decode.
//!
//! Whitespace between the operation letter and the address is optional. The address
//! may carry a `0x` prefix and must fit in 32 bits; the size is unsigned decimal.
//! Anything after the second comma up to the next whitespace is the data token.

/// Line-by-line trace reader.
pub mod reader;

pub use reader::{TraceLine, TraceReader};

use std::fmt;

use crate::common::TraceParseError;

/// Kind of memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceOp {
    /// `I`: instruction fetch through L1-I.
    Fetch,
    /// `L`: data load through L1-D.
    Load,
    /// `S`: data store (write-no-allocate).
    Store,
    /// `M`: load followed by a store to the same address.
    Modify,
}

impl TraceOp {
    /// Decodes an operation letter.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::Fetch),
            'L' => Some(Self::Load),
            'S' => Some(Self::Store),
            'M' => Some(Self::Modify),
            _ => None,
        }
    }

    /// The trace letter of this operation.
    pub const fn as_char(self) -> char {
        match self {
            Self::Fetch => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }

    /// Whether the operation writes memory.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Store | Self::Modify)
    }
}

/// One decoded trace operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Operation kind.
    pub op: TraceOp,
    /// Byte address accessed.
    pub addr: u32,
    /// Access size in bytes, as written in the trace. Not used for cache decisions.
    pub size: u32,
    /// Optional data token (stores carry the written value here).
    pub data: Option<String>,
}

impl TraceRecord {
    /// Creates a record without a data token.
    pub const fn new(op: TraceOp, addr: u32, size: u32) -> Self {
        Self {
            op,
            addr,
            size,
            data: None,
        }
    }

    /// Attaches a data token.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// The data token, or an empty string when absent.
    pub fn data_or_empty(&self) -> &str {
        self.data.as_deref().unwrap_or("")
    }
}

impl fmt::Display for TraceRecord {
    /// Echo format: `<op> <addr, 8 hex digits>, <size>[, <data>]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:08x}, {}", self.op.as_char(), self.addr, self.size)?;
        if let Some(data) = &self.data {
            write!(f, ", {data}")?;
        }
        Ok(())
    }
}

/// Decodes one trace line.
///
/// # Arguments
///
/// * `line` - The raw line, with or without its line terminator.
///
/// # Returns
///
/// The decoded record, or the reason the line is not an operation.
pub fn parse_line(line: &str) -> Result<TraceRecord, TraceParseError> {
    let line = line.trim();
    let mut chars = line.chars();
    let op_char = chars.next().ok_or(TraceParseError::Empty)?;
    let op = TraceOp::from_char(op_char).ok_or(TraceParseError::UnknownOp(op_char))?;

    let rest = chars.as_str().trim_start();
    let mut fields = rest.splitn(3, ',');

    let addr_field = fields
        .next()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or(TraceParseError::MissingField("address"))?;
    let addr = parse_hex_u32(addr_field)
        .ok_or_else(|| TraceParseError::BadAddress(addr_field.to_string()))?;

    let size_field = fields
        .next()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or(TraceParseError::MissingField("size"))?;
    let size = size_field
        .parse::<u32>()
        .map_err(|_| TraceParseError::BadSize(size_field.to_string()))?;

    let data = fields
        .next()
        .and_then(|f| f.split_whitespace().next())
        .map(str::to_string);

    Ok(TraceRecord {
        op,
        addr,
        size,
        data,
    })
}

/// Parses a 32-bit hexadecimal number with an optional `0x`/`0X` prefix.
fn parse_hex_u32(s: &str) -> Option<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
