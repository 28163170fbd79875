//! Bit-parallel lane summation.
//!
//! A 1-bit mask is replicated into every lane. The word is shifted past the
//! mask one bit at a time, and each step adds the exposed bit of every lane
//! in parallel. Folding the lanes together gives the total.

/// One bit in the low position of each byte.
const BYTE_LANES: u32 = 0x0101_0101;

/// One bit in the low position of each 6-bit lane (bits 0, 6, 12, 18, 24, 30).
const SEXTET_LANES: u32 = 0o10101010101;

/// Byte-lane summation, looped.
///
/// Each byte accumulates the count of its own 8 bits (at most 8). The
/// four byte sums are then folded into the low byte.
#[inline(always)]
pub fn popcount_8(mut n: u32) -> u32 {
    let mut c = n & BYTE_LANES;
    for _ in 0..7 {
        n >>= 1;
        c += n & BYTE_LANES;
    }
    c += c >> 8;
    c += c >> 16;
    c & 0x3f
}

/// Byte-lane summation with every shift written out.
#[inline(always)]
pub fn popcount_8_unrolled(n: u32) -> u32 {
    let m = BYTE_LANES;
    let mut c = (n & m)
        + ((n >> 1) & m)
        + ((n >> 2) & m)
        + ((n >> 3) & m)
        + ((n >> 4) & m)
        + ((n >> 5) & m)
        + ((n >> 6) & m)
        + ((n >> 7) & m);
    c += c >> 8;
    c += c >> 16;
    c & 0x3f
}

/// 6-bit-lane summation, looped.
///
/// Five full lanes and a 2-bit top lane. A lane holds at most 6, so the
/// pairwise folds never carry across lane boundaries before the final
/// sum lands in the low lane.
#[inline(always)]
pub fn popcount_6(mut n: u32) -> u32 {
    let mut c = n & SEXTET_LANES;
    for _ in 0..5 {
        n >>= 1;
        c += n & SEXTET_LANES;
    }
    c += c >> 6;
    c += c >> 12;
    c += c >> 24;
    c & 0x3f
}

/// 6-bit-lane summation with every shift written out.
#[inline(always)]
pub fn popcount_6_unrolled(n: u32) -> u32 {
    let m = SEXTET_LANES;
    let mut c = (n & m)
        + ((n >> 1) & m)
        + ((n >> 2) & m)
        + ((n >> 3) & m)
        + ((n >> 4) & m)
        + ((n >> 5) & m);
    c += c >> 6;
    c += c >> 12;
    c += c >> 24;
    c & 0x3f
}
