//! Cache lookup.
//!
//! A lookup decides hit or miss for one address and, on a hit, may refresh the
//! line's recency stamp. It never allocates: filling after a miss is a separate
//! step (see [`super::fill`]) so that the store path can look up without allocating.

use tracing::info;

use super::Cache;
use crate::common::LogicalTime;
use crate::stats::LevelStats;

impl Cache {
    /// Looks up `addr`, counting the result in `stats`.
    ///
    /// Scans the addressed set for a valid line with a matching tag. At most one
    /// line can match because a tag is never installed twice in one set.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address being accessed.
    /// * `now` - Current logical time.
    /// * `update_recency` - Whether a hit stamps `last_used = now` on the matching line.
    /// * `stats` - Counters of this level; gets one hit or one miss.
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    pub fn lookup(
        &mut self,
        addr: u32,
        now: LogicalTime,
        update_recency: bool,
        stats: &mut LevelStats,
    ) -> bool {
        let (tag, set) = self.decode(addr);
        if let Some(way) = self.find(set, tag) {
            stats.record_hit();
            if update_recency {
                self.line_mut(set, way).last_used = now;
            }
            info!("  {} hit", self.name());
            true
        } else {
            stats.record_miss();
            info!("  {} miss", self.name());
            false
        }
    }
}
