//! Address decomposition.
//!
//! This module splits a 32-bit address into the fields a set-associative cache
//! indexes by. It provides:
//! 1. **Tag extraction:** The high-order bits above the set index and block offset.
//! 2. **Set selection:** The `s` bits directly above the block offset.
//! 3. **Block alignment:** The block base address and the byte offset inside a block.
//!
//! All functions are total over `u32` addresses for any geometry with `s + b <= 32`.

/// Extracts the tag of `addr` for a cache with `2^s` sets and `2^b`-byte blocks.
///
/// When `s + b == 32` every address shares the single tag `0`.
///
/// # Arguments
///
/// * `addr` - The byte address.
/// * `s` - Number of set-index bits.
/// * `b` - Number of block-offset bits.
///
/// # Returns
///
/// `addr >> (s + b)`.
#[inline]
pub const fn tag(addr: u32, s: u32, b: u32) -> u32 {
    match addr.checked_shr(s + b) {
        Some(t) => t,
        None => 0,
    }
}

/// Extracts the set index of `addr` for a cache with `2^s` sets and `2^b`-byte blocks.
///
/// # Arguments
///
/// * `addr` - The byte address.
/// * `s` - Number of set-index bits.
/// * `b` - Number of block-offset bits.
///
/// # Returns
///
/// `(addr >> b) & (2^s - 1)`, always `< 2^s`.
#[inline]
pub const fn set_index(addr: u32, s: u32, b: u32) -> u32 {
    let shifted = match addr.checked_shr(b) {
        Some(v) => v,
        None => 0,
    };
    shifted & low_mask(s)
}

/// Returns the first byte address of the block containing `addr`.
#[inline]
pub const fn block_base(addr: u32, b: u32) -> u32 {
    addr & !low_mask(b)
}

/// Returns the byte offset of `addr` within its `2^b`-byte block.
#[inline]
pub const fn block_offset(addr: u32, b: u32) -> u32 {
    addr & low_mask(b)
}

/// Rebuilds a block base address from its tag and set index.
///
/// Inverse of [`tag`] and [`set_index`]: for any `addr`,
/// `compose(tag(addr, s, b), set_index(addr, s, b), s, b) == block_base(addr, b)`.
#[inline]
pub const fn compose(tag: u32, set: u32, s: u32, b: u32) -> u32 {
    let high = match tag.checked_shl(s + b) {
        Some(v) => v,
        None => 0,
    };
    let mid = match set.checked_shl(b) {
        Some(v) => v,
        None => 0,
    };
    high | mid
}

/// Mask with the low `bits` bits set (`bits` may be 32).
#[inline]
const fn low_mask(bits: u32) -> u32 {
    if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 }
}
