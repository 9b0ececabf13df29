//! Block installation and victim selection.
//!
//! On a miss the dispatcher asks a level to install the addressed block. The victim
//! is chosen in this order:
//! 1. the line already holding the tag, refilled in place (keeps tags unique per set);
//! 2. the first invalid line;
//! 3. the valid line with the strictly smallest `last_used`, lowest way on ties.
//!
//! Only case 3 counts as an eviction.

use tracing::{debug, info};

use super::{Cache, CacheLine};
use crate::common::{LogicalTime, SimError};
use crate::memory::BlockSource;
use crate::stats::LevelStats;

/// Which line a fill will overwrite, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Victim {
    /// The tag is already resident in this way.
    Resident(usize),
    /// This way holds no block.
    Invalid(usize),
    /// All ways are valid; this one is least recently used.
    Lru(usize),
}

impl Victim {
    /// Way index of the chosen line.
    pub const fn way(self) -> usize {
        match self {
            Self::Resident(way) | Self::Invalid(way) | Self::Lru(way) => way,
        }
    }

    /// Whether filling this line displaces a valid block of another tag.
    pub const fn is_eviction(self) -> bool {
        matches!(self, Self::Lru(_))
    }
}

/// Picks the line to overwrite when installing `tag` into a set.
///
/// # Arguments
///
/// * `lines` - The set's lines in way order; must not be empty.
/// * `tag` - Tag being installed.
///
/// # Returns
///
/// The victim, per the order documented on this module.
pub fn select_victim(lines: &[CacheLine], tag: u32) -> Victim {
    if let Some(way) = lines.iter().position(|l| l.valid && l.tag == tag) {
        return Victim::Resident(way);
    }
    if let Some(way) = lines.iter().position(|l| !l.valid) {
        return Victim::Invalid(way);
    }
    let mut lru = 0;
    for (way, line) in lines.iter().enumerate().skip(1) {
        if line.last_used < lines[lru].last_used {
            lru = way;
        }
    }
    Victim::Lru(lru)
}

/// Block displaced by a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evicted {
    /// Tag of the displaced block.
    pub tag: u32,
    /// Its recency stamp at the time of eviction.
    pub last_used: LogicalTime,
}

/// Result of installing a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill {
    /// Set the block was placed in.
    pub set: u32,
    /// Way the block was placed in.
    pub way: usize,
    /// The valid block that was replaced, if any.
    pub evicted: Option<Evicted>,
}

impl Fill {
    /// Whether the fill evicted a valid line.
    pub const fn evicted(&self) -> bool {
        self.evicted.is_some()
    }
}

impl Cache {
    /// Installs the block containing `addr`, reading its bytes from `memory`.
    ///
    /// The block is read into the victim's slot first; metadata and the eviction
    /// counter are only updated once the read succeeded.
    ///
    /// # Arguments
    ///
    /// * `addr` - Any byte address inside the block to install.
    /// * `now` - Current logical time; becomes the line's `last_used`.
    /// * `memory` - Backing store the block is read from.
    /// * `stats` - Counters of this level; gets an eviction when a valid line is replaced.
    ///
    /// # Returns
    ///
    /// Where the block went and what it replaced, or the backing store's error.
    pub fn install<M: BlockSource + ?Sized>(
        &mut self,
        addr: u32,
        now: LogicalTime,
        memory: &mut M,
        stats: &mut LevelStats,
    ) -> Result<Fill, SimError> {
        let (tag, set) = self.decode(addr);
        let victim = select_victim(self.set(set as usize).lines(), tag);
        let way = victim.way();
        let previous = *self.set(set as usize).line(way);

        let base = self.block_base(addr);
        memory.read_block(base, self.block_mut(set, way))?;

        *self.line_mut(set, way) = CacheLine {
            valid: true,
            tag,
            last_used: now,
        };

        let evicted = victim.is_eviction().then(|| {
            stats.record_eviction();
            debug!(
                "  {} evict tag {:08x} (last used {}) from set {set} way {way}",
                self.name(),
                previous.tag,
                previous.last_used
            );
            Evicted {
                tag: previous.tag,
                last_used: previous.last_used,
            }
        });

        info!("  Place in {} set {set}", self.name());
        Ok(Fill { set, way, evicted })
    }
}
