//! Cache Dump Unit Tests.
//!
//! Verifies the text written for each cache: a `Set <i>` header per set, then one
//! `<tag> <last_used> 1 <bytes>` row per valid line in way order.

use cachesim_core::cache::CacheLine;
use cachesim_core::cache::dump::{dump_to_file, dump_to_string, format_line};
use cachesim_core::common::SimError;
use cachesim_core::stats::LevelStats;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::common::harness::{addr_of, cache};
use crate::common::mocks::memory::MockMemory;

/// Row format: zero-padded lowercase tag, decimal stamp, valid flag, then the bytes.
#[test]
fn row_format() {
    let l = CacheLine {
        valid: true,
        tag: 0xAB,
        last_used: 12,
    };
    assert_eq!(format_line(&l, &[0x00, 0x0F, 0xA0, 0xFF]), "000000ab 12 1 000fa0ff");
}

/// Each row carries exactly `2 * 2^b` hex digits of data.
#[test]
fn row_hex_length_matches_block_size() {
    for b in [0, 2, 4, 6] {
        let mut c = cache(0, 1, b);
        let mut mem = MockMemory::new(1024);
        let _ = c.install(0, 0, &mut mem, &mut LevelStats::default()).unwrap();

        let text = dump_to_string(&c);
        let row = text.lines().nth(1).unwrap();
        let hex = row.rsplit(' ').next().unwrap();
        assert_eq!(hex.len(), 2 << b, "b = {b}");
    }
}

/// An empty cache dumps only its set headers.
#[test]
fn empty_cache_dumps_headers_only() {
    let c = cache(2, 2, 4);
    assert_eq!(dump_to_string(&c), "Set 0\nSet 1\nSet 2\nSet 3\n");
}

/// Valid lines appear under their set in way order; invalid lines are omitted.
#[test]
fn dump_lists_valid_lines_per_set() {
    let mut c = cache(1, 2, 2);
    let mut mem = MockMemory::new(1024);
    let mut stats = LevelStats::default();

    let _ = c.install(addr_of(5, 1, 1, 2), 0, &mut mem, &mut stats).unwrap();
    let _ = c.install(addr_of(2, 1, 1, 2), 1, &mut mem, &mut stats).unwrap();
    let _ = c.install(addr_of(3, 0, 1, 2), 2, &mut mem, &mut stats).unwrap();

    // Blocks are 4 bytes; the pattern store holds `addr mod 256` at each address.
    let expected = "\
Set 0
00000003 2 1 18191a1b
Set 1
00000005 0 1 2c2d2e2f
00000002 1 1 14151617
";
    assert_eq!(dump_to_string(&c), expected);
}

/// `dump_to_file` writes the same text as `dump_to_string`.
#[test]
fn dump_to_file_matches_string() {
    let mut c = cache(1, 2, 4);
    let mut mem = MockMemory::new(1024);
    let _ = c.install(0x70, 4, &mut mem, &mut LevelStats::default()).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("L1D.txt");
    dump_to_file(&c, &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), dump_to_string(&c));
}

/// An unwritable destination is reported as a dump error naming the path.
#[test]
fn dump_to_missing_directory_fails() {
    let c = cache(0, 1, 4);
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("L2.txt");

    let err = dump_to_file(&c, &path).unwrap_err();
    match err {
        SimError::Dump { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected a dump error, got {other:?}"),
    }
}
