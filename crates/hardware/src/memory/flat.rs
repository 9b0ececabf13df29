//! In-memory flat byte store.

use std::io;

use super::BlockSource;
use crate::common::SimError;

/// Flat byte-addressable store held in memory.
///
/// Reads past the end of the store fail the same way a short file read does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMemory {
    bytes: Vec<u8>,
}

impl FlatMemory {
    /// Wraps an existing image.
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Creates a store of `size` bytes where byte `n` holds `n mod 256`.
    ///
    /// Handy as a fixture: every block has distinct, predictable contents.
    pub fn with_pattern(size: usize) -> Self {
        Self {
            bytes: (0..size).map(|i| (i % 256) as u8).collect(),
        }
    }

    /// Size of the store in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the store holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw view of the image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl BlockSource for FlatMemory {
    fn read_block(&mut self, base: u32, buf: &mut [u8]) -> Result<(), SimError> {
        let start = base as usize;
        let block = start
            .checked_add(buf.len())
            .and_then(|end| self.bytes.get(start..end));
        match block {
            Some(src) => {
                buf.copy_from_slice(src);
                Ok(())
            }
            None => Err(SimError::BackingStore {
                addr: base,
                len: buf.len(),
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("store holds only {} bytes", self.bytes.len()),
                ),
            }),
        }
    }
}
