//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline geometry for L1 and L2, the RAM image path and dump file names.
//! 2. **Structures:** Hierarchical config for the two cache geometries, memory and output.
//! 3. **Validation:** Geometry checks performed before any cache is allocated.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built from `Config::default()`
//! and overridden field by field from the command line.

use std::path::PathBuf;

use serde::Deserialize;

use crate::cache::CacheLine;
use crate::common::SimError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hierarchy when not explicitly
/// overridden in a JSON configuration file or on the command line.
mod defaults {
    /// L1 set-index bits (2 sets).
    pub const L1_SET_BITS: u32 = 1;

    /// L1 associativity (2 ways).
    pub const L1_WAYS: usize = 2;

    /// L1 block-offset bits (16-byte blocks).
    pub const L1_BLOCK_BITS: u32 = 4;

    /// L2 set-index bits (4 sets).
    pub const L2_SET_BITS: u32 = 2;

    /// L2 associativity (4 ways).
    pub const L2_WAYS: usize = 4;

    /// L2 block-offset bits (16-byte blocks).
    pub const L2_BLOCK_BITS: u32 = 4;

    /// Backing RAM image read on every fill.
    pub const RAM_PATH: &str = "RAM.dat";

    /// Dump file for the L1 instruction cache.
    pub const L1I_FILE: &str = "L1I.txt";

    /// Dump file for the L1 data cache.
    pub const L1D_FILE: &str = "L1D.txt";

    /// Dump file for the unified L2 cache.
    pub const L2_FILE: &str = "L2.txt";
}

/// Largest supported block-offset width (64 KiB blocks).
pub const MAX_BLOCK_BITS: u32 = 16;

/// Largest supported set-index width (16 Mi sets).
pub const MAX_SET_BITS: u32 = 24;

/// Largest supported storage per cache level, line metadata plus blocks (1 GiB).
pub const MAX_CACHE_BYTES: usize = 1 << 30;

/// Root configuration structure.
///
/// A geometry object, when present, must carry all three of `s`, `E` and `b`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Geometry shared by the L1 instruction and L1 data caches.
    #[serde(default = "GeometryConfig::default_l1")]
    pub l1: GeometryConfig,

    /// Geometry of the unified L2 cache.
    #[serde(default = "GeometryConfig::default_l2")]
    pub l2: GeometryConfig,

    /// Backing store settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Dump file settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            l1: GeometryConfig::default_l1(),
            l2: GeometryConfig::default_l2(),
            memory: MemoryConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from JSON text. Missing sections and fields take their defaults.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON document.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or `SimError::Config` on malformed input.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks both cache geometries.
    pub fn validate(&self) -> Result<(), SimError> {
        self.l1.validate("L1")?;
        self.l2.validate("L2")
    }
}

/// Geometry of one cache level in the textbook `(s, E, b)` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GeometryConfig {
    /// Number of set-index bits `s`; the cache has `2^s` sets.
    #[serde(alias = "s")]
    pub set_bits: u32,

    /// Associativity `E`: lines per set.
    #[serde(alias = "E")]
    pub ways: usize,

    /// Number of block-offset bits `b`; each block holds `2^b` bytes.
    #[serde(alias = "b")]
    pub block_bits: u32,
}

impl GeometryConfig {
    /// Returns the default L1 geometry (`s=1, E=2, b=4`).
    pub const fn default_l1() -> Self {
        Self {
            set_bits: defaults::L1_SET_BITS,
            ways: defaults::L1_WAYS,
            block_bits: defaults::L1_BLOCK_BITS,
        }
    }

    /// Returns the default L2 geometry (`s=2, E=4, b=4`).
    pub const fn default_l2() -> Self {
        Self {
            set_bits: defaults::L2_SET_BITS,
            ways: defaults::L2_WAYS,
            block_bits: defaults::L2_BLOCK_BITS,
        }
    }

    /// Number of sets (`2^s`).
    pub const fn num_sets(&self) -> usize {
        1usize << self.set_bits
    }

    /// Block size in bytes (`2^b`).
    pub const fn block_size(&self) -> usize {
        1usize << self.block_bits
    }

    /// Bytes a cache with this geometry allocates: `2^s * E` lines, each with its
    /// metadata and a `2^b`-byte block. `None` if that does not fit in `usize`.
    pub const fn arena_bytes(&self) -> Option<usize> {
        let per_line = self.block_size() + size_of::<CacheLine>();
        match self.num_sets().checked_mul(self.ways) {
            Some(lines) => lines.checked_mul(per_line),
            None => None,
        }
    }

    /// Checks that the geometry describes a cache that can be built.
    ///
    /// # Arguments
    ///
    /// * `level` - Level name used in the error message.
    ///
    /// # Returns
    ///
    /// `SimError::InvalidGeometry` if associativity is zero, a field exceeds its
    /// maximum, the set and offset bits together exceed the 32-bit address, or
    /// the cache storage would exceed [`MAX_CACHE_BYTES`].
    pub fn validate(&self, level: &'static str) -> Result<(), SimError> {
        let invalid = |reason: String| Err(SimError::InvalidGeometry { level, reason });
        if self.ways == 0 {
            return invalid("associativity must be at least 1".to_string());
        }
        if self.set_bits > MAX_SET_BITS {
            return invalid(format!(
                "s={} exceeds the maximum of {MAX_SET_BITS}",
                self.set_bits
            ));
        }
        if self.block_bits > MAX_BLOCK_BITS {
            return invalid(format!(
                "b={} exceeds the maximum of {MAX_BLOCK_BITS}",
                self.block_bits
            ));
        }
        if self.set_bits + self.block_bits > 32 {
            return invalid(format!(
                "s+b={} does not fit a 32-bit address",
                self.set_bits + self.block_bits
            ));
        }
        match self.arena_bytes() {
            Some(bytes) if bytes <= MAX_CACHE_BYTES => Ok(()),
            _ => invalid(format!(
                "2^{} sets x {} ways x 2^{}-byte blocks exceeds the {MAX_CACHE_BYTES}-byte storage limit",
                self.set_bits, self.ways, self.block_bits
            )),
        }
    }
}

/// Backing store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Path of the flat RAM image blocks are loaded from.
    #[serde(default = "MemoryConfig::default_ram_path")]
    pub ram_path: PathBuf,
}

impl MemoryConfig {
    fn default_ram_path() -> PathBuf {
        PathBuf::from(defaults::RAM_PATH)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_path: Self::default_ram_path(),
        }
    }
}

/// Cache dump configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the dump files are written to.
    #[serde(default = "OutputConfig::default_dir")]
    pub dir: PathBuf,

    /// File name of the L1 instruction cache dump.
    #[serde(default = "OutputConfig::default_l1i_file")]
    pub l1i_file: String,

    /// File name of the L1 data cache dump.
    #[serde(default = "OutputConfig::default_l1d_file")]
    pub l1d_file: String,

    /// File name of the L2 cache dump.
    #[serde(default = "OutputConfig::default_l2_file")]
    pub l2_file: String,
}

impl OutputConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_l1i_file() -> String {
        defaults::L1I_FILE.to_string()
    }

    fn default_l1d_file() -> String {
        defaults::L1D_FILE.to_string()
    }

    fn default_l2_file() -> String {
        defaults::L2_FILE.to_string()
    }

    /// Full paths of the three dump files, in L1I, L1D, L2 order.
    pub fn paths(&self) -> [PathBuf; 3] {
        [
            self.dir.join(&self.l1i_file),
            self.dir.join(&self.l1d_file),
            self.dir.join(&self.l2_file),
        ]
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            l1i_file: Self::default_l1i_file(),
            l1d_file: Self::default_l1d_file(),
            l2_file: Self::default_l2_file(),
        }
    }
}

impl Default for GeometryConfig {
    /// Defaults to the L1 geometry.
    fn default() -> Self {
        Self::default_l1()
    }
}
