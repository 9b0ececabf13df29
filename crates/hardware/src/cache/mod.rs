//! Set-Associative Cache.
//!
//! This module implements the cache data structure shared by all three levels of the
//! hierarchy. It provides:
//! 1. **Storage:** `2^s` sets of `E` lines; line metadata and `2^b`-byte data blocks are
//!    preallocated in flat arenas indexed by `(set, way)`.
//! 2. **Lookup:** Hit/miss decision with optional recency refresh (see [`access`]).
//! 3. **Fill:** Victim selection (invalid first, then LRU) and block installation (see [`fill`]).
//! 4. **Dump:** Serialization of the resident lines (see [`dump`]).
//!
//! Lines are never destroyed; a fill overwrites a line in place.

/// Hit/miss lookup with recency refresh.
pub mod access;

/// Resident-state dump writer.
pub mod dump;

/// Victim selection and block installation.
pub mod fill;

pub use fill::{Evicted, Fill, Victim};

use crate::common::LogicalTime;
use crate::common::addr;
use crate::config::GeometryConfig;

/// Metadata of one cache line. Its data block lives in the owning cache's arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Whether the line holds a block.
    pub valid: bool,
    /// Tag of the resident block; meaningless while `valid` is false.
    pub tag: u32,
    /// Logical time of the last fill or recency-refreshing hit.
    pub last_used: LogicalTime,
}

/// Read-only view of one set: `E` lines and their data blocks, in way order.
#[derive(Clone, Copy, Debug)]
pub struct CacheSet<'a> {
    index: usize,
    lines: &'a [CacheLine],
    data: &'a [u8],
    block_size: usize,
}

impl<'a> CacheSet<'a> {
    /// Index of this set within the cache.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of lines (the associativity).
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` for a set with no lines (never the case for a built cache).
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All line metadata in way order.
    pub const fn lines(&self) -> &'a [CacheLine] {
        self.lines
    }

    /// Metadata of the line in `way`.
    pub fn line(&self, way: usize) -> &'a CacheLine {
        &self.lines[way]
    }

    /// Data block of the line in `way`.
    pub fn block(&self, way: usize) -> &'a [u8] {
        let start = way * self.block_size;
        &self.data[start..start + self.block_size]
    }

    /// Valid lines with their way index and data block, in way order.
    pub fn valid_lines(self) -> impl Iterator<Item = (usize, &'a CacheLine, &'a [u8])> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.valid)
            .map(move |(way, line)| (way, line, self.block(way)))
    }
}

/// A set-associative cache level.
///
/// Holds `2^s` sets of `E` lines with `2^b`-byte blocks. Geometry is fixed at construction.
#[derive(Clone, Debug)]
pub struct Cache {
    name: &'static str,
    set_bits: u32,
    block_bits: u32,
    ways: usize,
    lines: Vec<CacheLine>,
    data: Vec<u8>,
}

impl Cache {
    /// Creates an empty cache (all lines invalid, all data zeroed).
    ///
    /// The geometry is expected to have passed [`GeometryConfig::validate`].
    ///
    /// # Arguments
    ///
    /// * `name` - Level name used in log output and reports (e.g. `"L1D"`).
    /// * `geometry` - The `(s, E, b)` geometry.
    pub fn new(name: &'static str, geometry: &GeometryConfig) -> Self {
        let num_lines = geometry.num_sets() * geometry.ways;
        Self {
            name,
            set_bits: geometry.set_bits,
            block_bits: geometry.block_bits,
            ways: geometry.ways,
            lines: vec![CacheLine::default(); num_lines],
            data: vec![0; num_lines * geometry.block_size()],
        }
    }

    /// Level name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Geometry this cache was built with.
    pub const fn geometry(&self) -> GeometryConfig {
        GeometryConfig {
            set_bits: self.set_bits,
            ways: self.ways,
            block_bits: self.block_bits,
        }
    }

    /// Number of sets (`2^s`).
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Associativity (`E`).
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Block size in bytes (`2^b`).
    pub const fn block_size(&self) -> usize {
        1 << self.block_bits
    }

    /// Splits `addr` into `(tag, set_index)` for this cache's geometry.
    #[inline]
    pub const fn decode(&self, addr: u32) -> (u32, u32) {
        (
            addr::tag(addr, self.set_bits, self.block_bits),
            addr::set_index(addr, self.set_bits, self.block_bits),
        )
    }

    /// Block-aligned base address of the block containing `addr`.
    #[inline]
    pub const fn block_base(&self, addr: u32) -> u32 {
        addr::block_base(addr, self.block_bits)
    }

    /// Returns a view of set `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_sets()`.
    pub fn set(&self, index: usize) -> CacheSet<'_> {
        let first = index * self.ways;
        let bs = self.block_size();
        CacheSet {
            index,
            lines: &self.lines[first..first + self.ways],
            data: &self.data[first * bs..(first + self.ways) * bs],
            block_size: bs,
        }
    }

    /// Views of every set, in index order.
    pub fn sets(&self) -> impl Iterator<Item = CacheSet<'_>> + '_ {
        (0..self.num_sets()).map(move |i| self.set(i))
    }

    /// Way holding a valid line tagged `tag` in `set`, if any.
    pub fn find(&self, set: u32, tag: u32) -> Option<usize> {
        self.set(set as usize)
            .lines()
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Returns `true` if the block containing `addr` is resident. Does not touch stats or recency.
    pub fn contains(&self, addr: u32) -> bool {
        let (tag, set) = self.decode(addr);
        self.find(set, tag).is_some()
    }

    /// Number of valid lines across all sets.
    pub fn resident_lines(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Flat arena index of `(set, way)`.
    #[inline]
    const fn slot(&self, set: u32, way: usize) -> usize {
        set as usize * self.ways + way
    }

    /// Mutable line metadata for `(set, way)`.
    fn line_mut(&mut self, set: u32, way: usize) -> &mut CacheLine {
        let slot = self.slot(set, way);
        &mut self.lines[slot]
    }

    /// Mutable data block for `(set, way)`.
    fn block_mut(&mut self, set: u32, way: usize) -> &mut [u8] {
        let bs = self.block_size();
        let start = self.slot(set, way) * bs;
        &mut self.data[start..start + bs]
    }
}
