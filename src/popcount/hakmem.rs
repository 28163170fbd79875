//! HAKMEM item 169 and its division-free variant.
//!
//! The word is split into 3-bit fields. `n - (n >> 1) - (n >> 2)`, masked
//! per field, leaves each field holding its own bit count. Adjacent fields
//! are then summed into 6-bit fields, which are octal digit pairs of a
//! base-64 number. Since 64 is 1 mod 63, reducing that number mod 63 sums
//! its digits.

/// Low two bits of each 3-bit field.
const FIELD_MASK: u32 = 0o33333333333;

/// Alternate 3-bit fields, starting with the top two bits.
const PAIR_MASK: u32 = 0o30707070707;

#[inline(always)]
fn field_sums(mask: u32) -> u32 {
    let y = (mask >> 1) & FIELD_MASK;
    let y = mask - y - ((y >> 1) & FIELD_MASK);
    (y + (y >> 3)) & PAIR_MASK
}

/// HAKMEM 169 with a hardware modulus.
///
/// 9 ops plus a divide, 2 long immediates.
#[inline(always)]
pub fn popcount_hakmem(mask: u32) -> u32 {
    field_sums(mask) % 63
}

/// Unsigned remainder by 63 without a division.
///
/// Joe Keane, sci.math.num-analysis, 9 July 1995, as cited in the
/// Hacker's Delight errata. Exact for every `u32`.
#[inline(always)]
pub fn remu63(n: u32) -> u32 {
    let t = ((n >> 12).wrapping_add(n) >> 10).wrapping_add(n << 2);
    let t = ((t >> 6).wrapping_add(t).wrapping_add(3)) & 0xff;
    (t - (t >> 6)) >> 2
}

/// HAKMEM 169 with Keane's modulus.
///
/// 21 ops, 2 long immediates, no divide.
#[inline(always)]
pub fn popcount_keane(mask: u32) -> u32 {
    remu63(field_sums(mask))
}
