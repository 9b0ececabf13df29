//! Simulation statistics collection and reporting.
//!
//! This module tracks the per-level counters of the hierarchy. It provides:
//! 1. **Level counters:** Hits, misses and evictions for one cache level.
//! 2. **Hierarchy counters:** One triple each for L1-I, L1-D and L2.
//! 3. **Reporting:** The end-of-run summary, one line per level.
//!
//! Counters only ever increase during a run; `evictions <= misses` always holds
//! because an eviction happens only on a fill and a fill only follows a miss.

use std::fmt;

/// Hit, miss and eviction counters for a single cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Lookups that found the block.
    pub hits: u64,
    /// Lookups that did not find the block.
    pub misses: u64,
    /// Fills that replaced a valid line.
    pub evictions: u64,
}

impl LevelStats {
    /// Counts a lookup hit.
    #[inline]
    pub const fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a lookup miss.
    #[inline]
    pub const fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts a fill that displaced a valid line.
    #[inline]
    pub const fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Total lookups (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, or `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Counters for the whole hierarchy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    /// L1 instruction cache.
    pub l1i: LevelStats,
    /// L1 data cache.
    pub l1d: LevelStats,
    /// Unified L2 cache.
    pub l2: LevelStats,
}

impl HierarchyStats {
    /// Levels paired with their report names, in report order.
    pub const fn levels(&self) -> [(&'static str, &LevelStats); 3] {
        [("L1I", &self.l1i), ("L1D", &self.l1d), ("L2", &self.l2)]
    }
}

impl fmt::Display for LevelStats {
    /// Formats as `hits:<n> misses:<n> evictions:<n>` (without a level prefix).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

impl fmt::Display for HierarchyStats {
    /// Formats the final report: one `<Level>-hits:<n> <Level>-misses:<n> <Level>-evictions:<n>`
    /// line per level, each newline-terminated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, stats) in self.levels() {
            writeln!(
                f,
                "{name}-hits:{} {name}-misses:{} {name}-evictions:{}",
                stats.hits, stats.misses, stats.evictions
            )?;
        }
        Ok(())
    }
}
