//! RAM image on disk.
//!
//! The image is a flat byte array: byte `n` of the file is the byte at address `n`.
//! Every read opens the file, seeks to the block, reads it and closes the file again,
//! so no handle is held between cache operations.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::trace;

use super::BlockSource;
use crate::common::SimError;

/// Flat RAM image stored in a file.
#[derive(Debug, Clone)]
pub struct FileBackedMemory {
    path: PathBuf,
}

impl FileBackedMemory {
    /// Creates a store reading from `path`. The file is not opened until the first fill.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the RAM image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_at(&self, base: u32, buf: &mut [u8]) -> io::Result<()> {
        let mut file = File::open(&self.path)?;
        let _ = file.seek(SeekFrom::Start(u64::from(base)))?;
        file.read_exact(buf)
    }
}

impl BlockSource for FileBackedMemory {
    fn read_block(&mut self, base: u32, buf: &mut [u8]) -> Result<(), SimError> {
        trace!(addr = base, len = buf.len(), "RAM block read");
        self.read_at(base, buf)
            .map_err(|source| SimError::BackingStore {
                addr: base,
                len: buf.len(),
                source,
            })
    }
}
