//! Hierarchy Dispatch Tests.
//!
//! Verifies the per-operation protocol across L1-I, L1-D and L2:
//! read-through fills for fetches and loads, the write-no-allocate double lookup
//! for stores, the combined modify protocol and the logical clock.
//!
//! Unless stated otherwise the hierarchy uses the default geometry:
//!   - L1 (each): s=1, E=2, b=4  → set = (addr >> 4) & 1
//!   - L2:        s=2, E=4, b=4  → set = (addr >> 4) & 3

use cachesim_core::Hierarchy;
use cachesim_core::common::SimError;
use cachesim_core::sim::StoreOutcome;
use cachesim_core::stats::LevelStats;
use cachesim_core::trace::{TraceOp, TraceRecord};

use crate::common::harness::{TestContext, geometry};
use crate::common::mocks::memory::UnavailableMemory;

fn counts(level: &LevelStats) -> (u64, u64, u64) {
    (level.hits, level.misses, level.evictions)
}

// ══════════════════════════════════════════════════════════
// 1. Loads and Fetches
// ══════════════════════════════════════════════════════════

/// Two loads of the same address: cold miss everywhere, then an L1-D hit.
#[test]
fn repeated_load_hits_l1d() {
    let mut ctx = TestContext::default();

    let first = ctx.load(0x0);
    assert!(!first.l1_hit);
    assert_eq!(first.l2_hit, Some(false));

    let second = ctx.load(0x0);
    assert!(second.l1_hit);
    assert_eq!(second.l2_hit, None, "L2 is not consulted on an L1 hit");

    let stats = ctx.hierarchy.stats();
    assert_eq!(counts(&stats.l1d), (1, 1, 0));
    assert_eq!(counts(&stats.l2), (0, 1, 0));
    assert_eq!(counts(&stats.l1i), (0, 0, 0));
    assert!(ctx.hierarchy.l1d().contains(0x0));
    assert!(ctx.hierarchy.l2().contains(0x0));
}

/// A double miss fills L2 and then L1, reading the block once per level.
#[test]
fn double_miss_fills_both_levels() {
    let mut ctx = TestContext::default();
    let _ = ctx.load(0x1234);
    assert_eq!(ctx.memory.reads(), &[(0x1230, 16), (0x1230, 16)]);
}

/// A fetch that hits L2 still fills L1-I from memory.
#[test]
fn fetch_with_l2_hit_fills_l1i() {
    let mut ctx = TestContext::default();
    let _ = ctx.load(0x40);

    let fetch = ctx.fetch(0x40);
    assert!(!fetch.l1_hit);
    assert_eq!(fetch.l2_hit, Some(true));
    assert!(ctx.hierarchy.l1i().contains(0x40));
    assert_eq!(ctx.memory.reads().len(), 3);
    assert_eq!(counts(&ctx.hierarchy.stats().l1i), (0, 1, 0));
    assert_eq!(counts(&ctx.hierarchy.stats().l2), (1, 1, 0));
}

/// Instruction and data blocks live in separate L1 caches.
#[test]
fn fetch_and_load_use_split_l1() {
    let mut ctx = TestContext::default();
    let _ = ctx.fetch(0x80);
    let load = ctx.load(0x80);

    assert!(!load.l1_hit);
    assert_eq!(load.l2_hit, Some(true));
    assert!(ctx.hierarchy.l1i().contains(0x80));
    assert!(ctx.hierarchy.l1d().contains(0x80));
}

/// Direct-mapped L1: alternating conflicting blocks evict each other while L2 holds both.
#[test]
fn conflict_misses_in_direct_mapped_l1() {
    let mut ctx = TestContext::new(geometry(1, 1, 4), geometry(2, 4, 4));

    let _ = ctx.load(0x00);
    let _ = ctx.load(0x20);
    let third = ctx.load(0x00);

    assert!(!third.l1_hit);
    assert_eq!(third.l2_hit, Some(true));
    assert_eq!(counts(&ctx.hierarchy.stats().l1d), (0, 3, 2));
    assert_eq!(counts(&ctx.hierarchy.stats().l2), (1, 2, 0));
}

/// The hierarchy is not inclusive: an L2 eviction leaves the L1 copy in place.
#[test]
fn l2_eviction_does_not_invalidate_l1() {
    let mut ctx = TestContext::new(geometry(1, 2, 4), geometry(0, 1, 4));

    let _ = ctx.load(0x00);
    let _ = ctx.load(0x10);
    assert!(!ctx.hierarchy.l2().contains(0x00));
    assert_eq!(ctx.hierarchy.stats().l2.evictions, 1);

    let again = ctx.load(0x00);
    assert!(again.l1_hit);
}

// ══════════════════════════════════════════════════════════
// 2. Stores (write-no-allocate)
// ══════════════════════════════════════════════════════════

/// A store to an empty hierarchy misses both levels and allocates nothing.
#[test]
fn cold_store_does_not_allocate() {
    let mut ctx = TestContext::default();

    let store = ctx.store(0x100);
    assert!(!store.l1_hit);
    assert_eq!(store.l2_hit, Some(false));
    assert_eq!(store.store, Some(StoreOutcome::NoAllocate));

    assert_eq!(counts(&ctx.hierarchy.stats().l1d), (0, 1, 0));
    assert_eq!(counts(&ctx.hierarchy.stats().l2), (0, 1, 0));
    assert!(ctx.hierarchy.caches().iter().all(|c| c.resident_lines() == 0));
    assert!(ctx.memory.reads().is_empty(), "stores never read memory");
}

/// An L1-D hit does not short-circuit the L2 lookup.
#[test]
fn store_hit_still_looks_up_l2() {
    let mut ctx = TestContext::default();
    let _ = ctx.load(0x0);

    let store = ctx.store(0x0);
    assert!(store.l1_hit);
    assert_eq!(store.l2_hit, Some(true));
    assert_eq!(store.store, Some(StoreOutcome::ThroughCache));
    assert_eq!(counts(&ctx.hierarchy.stats().l1d), (1, 1, 0));
    assert_eq!(counts(&ctx.hierarchy.stats().l2), (1, 1, 0));
}

/// An L1-D miss with an L2 hit does not bring the block into L1-D.
#[test]
fn store_l2_hit_does_not_fill_l1d() {
    let mut ctx = TestContext::new(geometry(1, 1, 4), geometry(2, 4, 4));
    let _ = ctx.load(0x00);
    let _ = ctx.load(0x20);

    let store = ctx.store(0x00);
    assert!(!store.l1_hit);
    assert_eq!(store.l2_hit, Some(true));
    assert_eq!(store.store, Some(StoreOutcome::ThroughCache));
    assert!(!ctx.hierarchy.l1d().contains(0x00));
}

/// Store hits refresh recency, which changes the next LRU victim.
#[test]
fn store_hit_refreshes_recency() {
    let mut ctx = TestContext::default();
    let _ = ctx.load(0x00); // t0: L1D set 0, way 0
    let _ = ctx.load(0x20); // t1: L1D set 0, way 1
    let _ = ctx.store(0x00); // t2: refreshes way 0

    let _ = ctx.load(0x40); // t3: evicts way 1
    assert!(ctx.hierarchy.l1d().contains(0x00));
    assert!(!ctx.hierarchy.l1d().contains(0x20));
    assert_eq!(ctx.hierarchy.l1d().set(0).line(0).last_used, 2);
}

/// Stores leave cached bytes exactly as they were filled.
#[test]
fn store_does_not_modify_cached_data() {
    let mut ctx = TestContext::default();
    let _ = ctx.load(0x30);
    let before = ctx.hierarchy.l1d().set(1).block(0).to_vec();

    let _ = ctx.store(0x30);
    let _ = ctx.modify(0x30);
    assert_eq!(ctx.hierarchy.l1d().set(1).block(0), before.as_slice());
}

// ══════════════════════════════════════════════════════════
// 3. Modify
// ══════════════════════════════════════════════════════════

/// A cold modify is a full load (double miss, fills) followed by a store that hits both levels.
#[test]
fn cold_modify_counts() {
    let mut ctx = TestContext::default();

    let modify = ctx.modify(0x8);
    assert!(!modify.l1_hit);
    assert_eq!(modify.l2_hit, Some(false));
    assert_eq!(modify.store, Some(StoreOutcome::ThroughCache));

    assert_eq!(counts(&ctx.hierarchy.stats().l1d), (1, 1, 0));
    assert_eq!(counts(&ctx.hierarchy.stats().l2), (1, 1, 0));
    assert_eq!(ctx.hierarchy.clock(), 1, "a modify is one operation");
}

/// A warm modify hits L1-D twice and L2 once (the store lookup).
#[test]
fn warm_modify_counts() {
    let mut ctx = TestContext::default();
    let _ = ctx.load(0x8);
    let _ = ctx.modify(0x8);

    assert_eq!(counts(&ctx.hierarchy.stats().l1d), (2, 1, 0));
    assert_eq!(counts(&ctx.hierarchy.stats().l2), (1, 1, 0));
}

// ══════════════════════════════════════════════════════════
// 4. Clock and Errors
// ══════════════════════════════════════════════════════════

/// Every operation runs at the current clock and advances it by one.
#[test]
fn clock_advances_once_per_operation() {
    let mut ctx = TestContext::default();
    let times: Vec<u64> = [
        ctx.fetch(0x0).time,
        ctx.load(0x0).time,
        ctx.store(0x0).time,
        ctx.modify(0x0).time,
    ]
    .to_vec();

    assert_eq!(times, vec![0, 1, 2, 3]);
    assert_eq!(ctx.hierarchy.clock(), 4);
    assert_eq!(ctx.hierarchy.l1i().set(0).line(0).last_used, 0);
}

/// The size field does not influence which blocks are touched.
#[test]
fn access_size_is_ignored() {
    let mut ctx = TestContext::default();
    let _ = ctx.exec(TraceRecord::new(TraceOp::Load, 0x0C, 64));
    assert_eq!(ctx.memory.reads(), &[(0x00, 16), (0x00, 16)]);
    assert!(!ctx.hierarchy.l1d().contains(0x10));
}

/// A backing-store failure aborts the operation without advancing the clock.
#[test]
fn backing_store_failure_is_fatal() {
    let mut hierarchy = Hierarchy::with_geometry(&geometry(1, 2, 4), &geometry(2, 4, 4)).unwrap();
    let record = TraceRecord::new(TraceOp::Load, 0x0, 4);

    let err = hierarchy.execute(&record, &mut UnavailableMemory).unwrap_err();
    assert!(matches!(err, SimError::BackingStore { .. }));
    assert_eq!(hierarchy.clock(), 0);
    assert_eq!(hierarchy.l2().resident_lines(), 0);
}

/// An unusable geometry is rejected before anything is allocated.
#[test]
fn invalid_geometry_rejected() {
    let err = Hierarchy::with_geometry(&geometry(1, 0, 4), &geometry(2, 4, 4)).unwrap_err();
    assert!(matches!(err, SimError::InvalidGeometry { level: "L1", .. }));
}
