//! Cache dump writer.
//!
//! Writes the resident state of a cache as text. For each set in index order a
//! `Set <i>` header is written, followed by one row per valid line in way order:
//!
//! ```text
//! <tag, 8 lowercase hex digits> <last_used> 1 <block bytes, 2 lowercase hex digits each>
//! ```
//!
//! Invalid lines produce no row.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{Cache, CacheLine};
use crate::common::SimError;

/// Formats one dump row (without the trailing newline).
pub fn format_line(line: &CacheLine, block: &[u8]) -> String {
    let mut row = String::with_capacity(8 + 24 + 3 + block.len() * 2);
    let _ = write!(row, "{:08x} {} {} ", line.tag, line.last_used, u8::from(line.valid));
    for byte in block {
        let _ = write!(row, "{byte:02x}");
    }
    row
}

/// Writes the dump of `cache` to `out`.
///
/// # Arguments
///
/// * `cache` - The cache to dump.
/// * `out` - Destination writer.
///
/// # Returns
///
/// Any I/O error raised by `out`.
pub fn write_dump<W: Write>(cache: &Cache, out: &mut W) -> io::Result<()> {
    for set in cache.sets() {
        writeln!(out, "Set {}", set.index())?;
        for (_, line, block) in set.valid_lines() {
            writeln!(out, "{}", format_line(line, block))?;
        }
    }
    Ok(())
}

/// Renders the dump of `cache` into a string.
pub fn dump_to_string(cache: &Cache) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_dump(cache, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Writes the dump of `cache` to the file at `path`, replacing any existing file.
///
/// # Returns
///
/// `SimError::Dump` if the file cannot be created or written.
pub fn dump_to_file(cache: &Cache, path: &Path) -> Result<(), SimError> {
    let to_err = |source: io::Error| SimError::Dump {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_err)?;
    let mut out = BufWriter::new(file);
    write_dump(cache, &mut out).map_err(to_err)?;
    out.flush().map_err(to_err)
}
