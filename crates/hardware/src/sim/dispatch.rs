//! Operation dispatch across the cache hierarchy.
//!
//! `Hierarchy` owns the three cache levels, their counters and the logical clock,
//! and runs one trace operation per call:
//! 1. **Fetch / Load:** L1 lookup; on a miss, L2 lookup; on an L2 miss, fill L2 from
//!    memory; then fill L1 (even when L2 hit). The L1 fill comes last so its recency
//!    stamp is the current access.
//! 2. **Store:** L1-D and L2 are both looked up, always, with no short-circuit on an
//!    L1 hit, so both levels see the access in their counters and recency. Nothing is
//!    allocated (write-no-allocate) and cached data is never modified.
//! 3. **Modify:** the full load protocol followed by the store double lookup.
//!
//! Every operation runs at the current clock value and then advances the clock by one.

use tracing::info;

use crate::cache::Cache;
use crate::common::{LogicalTime, SimError};
use crate::config::{Config, GeometryConfig};
use crate::memory::BlockSource;
use crate::stats::{HierarchyStats, LevelStats};
use crate::trace::{TraceOp, TraceRecord};

/// Lookups on the dispatch path always refresh recency on a hit.
const REFRESH_ON_HIT: bool = true;

/// How a store reached memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    /// At least one level held the block; the write goes to memory through the cache.
    ThroughCache,
    /// Neither level held the block; the write goes straight to memory, nothing is allocated.
    NoAllocate,
}

/// What one operation did at each level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Operation that was executed.
    pub op: TraceOp,
    /// Logical time the operation ran at.
    pub time: LogicalTime,
    /// Result of the first L1 lookup (L1-I for fetches, L1-D otherwise).
    pub l1_hit: bool,
    /// Result of the first L2 lookup, if L2 was consulted.
    pub l2_hit: Option<bool>,
    /// How the write reached memory, for stores and modifies.
    pub store: Option<StoreOutcome>,
}

impl Outcome {
    const fn new(
        op: TraceOp,
        time: LogicalTime,
        read: ReadPath,
        store: Option<StoreOutcome>,
    ) -> Self {
        Self {
            op,
            time,
            l1_hit: read.l1_hit,
            l2_hit: read.l2_hit,
            store,
        }
    }
}

/// Outcome of the read path at one pair of levels.
#[derive(Clone, Copy)]
struct ReadPath {
    l1_hit: bool,
    l2_hit: Option<bool>,
}

/// Split L1 instruction/data caches over a unified L2, with counters and the logical clock.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    l1i: Cache,
    l1d: Cache,
    l2: Cache,
    stats: HierarchyStats,
    clock: LogicalTime,
}

impl Hierarchy {
    /// Builds an empty hierarchy from a validated configuration.
    ///
    /// # Returns
    ///
    /// `SimError::InvalidGeometry` if either geometry is unusable.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        Self::with_geometry(&config.l1, &config.l2)
    }

    /// Builds an empty hierarchy; both L1 caches share `l1`.
    pub fn with_geometry(l1: &GeometryConfig, l2: &GeometryConfig) -> Result<Self, SimError> {
        l1.validate("L1")?;
        l2.validate("L2")?;
        Ok(Self {
            l1i: Cache::new("L1I", l1),
            l1d: Cache::new("L1D", l1),
            l2: Cache::new("L2", l2),
            stats: HierarchyStats::default(),
            clock: 0,
        })
    }

    /// L1 instruction cache.
    pub const fn l1i(&self) -> &Cache {
        &self.l1i
    }

    /// L1 data cache.
    pub const fn l1d(&self) -> &Cache {
        &self.l1d
    }

    /// Unified L2 cache.
    pub const fn l2(&self) -> &Cache {
        &self.l2
    }

    /// All three levels in report order (L1I, L1D, L2).
    pub const fn caches(&self) -> [&Cache; 3] {
        [&self.l1i, &self.l1d, &self.l2]
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &HierarchyStats {
        &self.stats
    }

    /// Logical time the next operation will run at.
    pub const fn clock(&self) -> LogicalTime {
        self.clock
    }

    /// Executes one trace operation and advances the clock.
    ///
    /// # Arguments
    ///
    /// * `record` - The decoded operation.
    /// * `memory` - Backing store for fills.
    ///
    /// # Returns
    ///
    /// What happened at each level, or the backing store's error. On error the
    /// clock is left unchanged.
    pub fn execute<M: BlockSource + ?Sized>(
        &mut self,
        record: &TraceRecord,
        memory: &mut M,
    ) -> Result<Outcome, SimError> {
        let now = self.clock;
        let addr = record.addr;
        info!("{record}");

        let outcome = match record.op {
            TraceOp::Fetch => {
                let read = read_through(
                    (&mut self.l1i, &mut self.stats.l1i),
                    (&mut self.l2, &mut self.stats.l2),
                    addr,
                    now,
                    memory,
                )?;
                Outcome::new(record.op, now, read, None)
            }
            TraceOp::Load => {
                let read = self.load(addr, now, memory)?;
                Outcome::new(record.op, now, read, None)
            }
            TraceOp::Store => {
                let (l1_hit, l2_hit) = self.store_lookups(addr, now);
                let store = if l1_hit || l2_hit {
                    info!("  Store {} in RAM", record.data_or_empty());
                    StoreOutcome::ThroughCache
                } else {
                    info!("  Store {} in RAM (no allocation)", record.data_or_empty());
                    StoreOutcome::NoAllocate
                };
                let read = ReadPath {
                    l1_hit,
                    l2_hit: Some(l2_hit),
                };
                Outcome::new(record.op, now, read, Some(store))
            }
            TraceOp::Modify => {
                let read = self.load(addr, now, memory)?;
                let (l1_hit, l2_hit) = self.store_lookups(addr, now);
                info!("  Store {} in RAM", record.data_or_empty());
                let store = if l1_hit || l2_hit {
                    StoreOutcome::ThroughCache
                } else {
                    StoreOutcome::NoAllocate
                };
                Outcome::new(record.op, now, read, Some(store))
            }
        };

        self.clock += 1;
        Ok(outcome)
    }

    /// Read path through L1-D and L2.
    fn load<M: BlockSource + ?Sized>(
        &mut self,
        addr: u32,
        now: LogicalTime,
        memory: &mut M,
    ) -> Result<ReadPath, SimError> {
        read_through(
            (&mut self.l1d, &mut self.stats.l1d),
            (&mut self.l2, &mut self.stats.l2),
            addr,
            now,
            memory,
        )
    }

    /// Store pass: L1-D and L2 are both looked up, never allocating.
    fn store_lookups(&mut self, addr: u32, now: LogicalTime) -> (bool, bool) {
        let l1_hit = self
            .l1d
            .lookup(addr, now, REFRESH_ON_HIT, &mut self.stats.l1d);
        let l2_hit = self.l2.lookup(addr, now, REFRESH_ON_HIT, &mut self.stats.l2);
        (l1_hit, l2_hit)
    }
}

/// Looks `addr` up in L1, falling through to L2 and memory, and fills every level that missed.
fn read_through<M: BlockSource + ?Sized>(
    (l1, l1_stats): (&mut Cache, &mut LevelStats),
    (l2, l2_stats): (&mut Cache, &mut LevelStats),
    addr: u32,
    now: LogicalTime,
    memory: &mut M,
) -> Result<ReadPath, SimError> {
    if l1.lookup(addr, now, REFRESH_ON_HIT, l1_stats) {
        return Ok(ReadPath {
            l1_hit: true,
            l2_hit: None,
        });
    }
    let l2_hit = l2.lookup(addr, now, REFRESH_ON_HIT, l2_stats);
    if !l2_hit {
        let _ = l2.install(addr, now, memory, l2_stats)?;
    }
    let _ = l1.install(addr, now, memory, l1_stats)?;
    Ok(ReadPath {
        l1_hit: false,
        l2_hit: Some(l2_hit),
    })
}
