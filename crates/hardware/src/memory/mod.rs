//! Backing store for cache fills.
//!
//! This module defines where cache blocks come from on a miss. It provides:
//! 1. **`BlockSource`:** The capability the fill path depends on, so tests can inject fixtures.
//! 2. **`FileBackedMemory`:** A flat RAM image on disk, opened for every block read.
//! 3. **`FlatMemory`:** An in-memory flat byte store.
//!
//! The store is read-only from the simulator's point of view: stores never write back.

/// File-backed RAM image.
pub mod file;

/// In-memory flat byte store.
pub mod flat;

pub use file::FileBackedMemory;
pub use flat::FlatMemory;

use crate::common::SimError;

/// Source of block data for cache fills.
///
/// Implementors fill `buf` with `buf.len()` bytes starting at the block-aligned
/// address `base`. A store that cannot supply the whole block returns an error;
/// the simulator treats that as fatal.
pub trait BlockSource {
    /// Reads the block starting at `base` into `buf`.
    ///
    /// # Arguments
    ///
    /// * `base` - Block-aligned byte address.
    /// * `buf` - Destination buffer; its length is the block size.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the whole block was read, or `SimError::BackingStore`.
    fn read_block(&mut self, base: u32, buf: &mut [u8]) -> Result<(), SimError>;
}

impl<T: BlockSource + ?Sized> BlockSource for &mut T {
    fn read_block(&mut self, base: u32, buf: &mut [u8]) -> Result<(), SimError> {
        (**self).read_block(base, buf)
    }
}

impl<T: BlockSource + ?Sized> BlockSource for Box<T> {
    fn read_block(&mut self, base: u32, buf: &mut [u8]) -> Result<(), SimError> {
        (**self).read_block(base, buf)
    }
}
