//! Multiply-based reductions.

use crate::opaque::opaque_u32;

/// SWAR fold to byte counts, then one multiply to sum the bytes.
///
/// Multiplying by `0x01010101` adds every byte lane into the top byte.
/// This exact sequence is what LLVM rewrites to `popcnt`, so the
/// multiplier goes through [`opaque_u32`].
#[inline(always)]
pub fn popcount_mult(mut n: u32) -> u32 {
    n -= (n >> 1) & 0x5555_5555;
    n = (n & 0x3333_3333) + ((n >> 2) & 0x3333_3333);
    n = (n + (n >> 4)) & 0x0f0f_0f0f;
    n.wrapping_mul(opaque_u32(0x0101_0101)) >> 24
}

/// Spreads a 12-bit chunk into five staggered copies.
const SPREAD: u64 = 0x0001_0010_0100_1001;

/// Picks out one bit from each copy, each at a distinct multiple-of-5 offset.
const SELECT: u64 = 0x0084_2108_4210_8421;

#[inline(always)]
const fn count_12(chunk: u32) -> u32 {
    (((chunk as u64).wrapping_mul(SPREAD) & SELECT) % 0x1f) as u32
}

/// Sean Anderson's 64-bit multiply method, three 12-bit chunks at a time.
///
/// LLVM has no idiom rewrite for this sequence, so no optimizer barrier is
/// needed and the function stays `const`.
///
/// Every selected bit sits at a multiple of 5 and `2^5 = 1 (mod 31)`, so
/// reducing mod 31 adds them up. A chunk has at most 12 bits, which is below 31.
#[inline(always)]
pub const fn popcount_anderson(v: u32) -> u32 {
    count_12(v & 0xfff) + count_12((v & 0x00ff_f000) >> 12) + count_12(v >> 24)
}
