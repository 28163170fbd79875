//! Divide-and-conquer counting.
//!
//! Adjacent bit groups are summed into wider fields, doubling the field
//! width at every stage, until one fold leaves the total in the low bits.
//! The variants differ in the width of the first stage.

/// Binary divide-and-conquer with a single long immediate.
///
/// The four stage masks are derived from `0x00ff00ff`, each one by XOR with
/// a shifted copy of the next. 23 ops, 20 stages.
#[inline(always)]
pub fn popcount_2(mut n: u32) -> u32 {
    let m4 = 0x00ff_00ffu32;
    let m3 = m4 ^ (m4 << 4);
    let m2 = m3 ^ (m3 << 2);
    let m1 = m2 ^ (m2 << 1);
    n = (n & m1) + ((n >> 1) & m1);
    n = (n & m2) + ((n >> 2) & m2);
    n = (n & m3) + ((n >> 4) & m3);
    n = (n & m4) + ((n >> 8) & m4);
    n += n >> 16;
    n & 0x3f
}

/// Ternary first stage, then octal folding.
///
/// Summing three shifted copies under `0o11111111111` counts each 3-bit
/// field in place. 21 ops, 14 stages.
#[inline(always)]
pub fn popcount_3(mut n: u32) -> u32 {
    let m1 = 0o11111111111u32;
    let m2 = 0o30707070707u32;
    n = (n & m1) + ((n >> 1) & m1) + ((n >> 2) & m1);
    n = (n & m2) + ((n >> 3) & m2);
    n += n >> 6;
    n += n >> 12;
    n += n >> 24;
    n & 0x3f
}

/// Quaternary first stage, then nibble folding.
#[inline(always)]
pub fn popcount_4(mut n: u32) -> u32 {
    let m1 = 0x1111_1111u32;
    let m2 = 0x0f0f_0f0fu32;
    n = (n & m1) + ((n >> 1) & m1) + ((n >> 2) & m1) + ((n >> 3) & m1);
    n = (n & m2) + ((n >> 4) & m2);
    n += n >> 8;
    n += n >> 16;
    n & 0x3f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_masks() {
        let m4 = 0x00ff_00ffu32;
        let m3 = m4 ^ (m4 << 4);
        let m2 = m3 ^ (m3 << 2);
        let m1 = m2 ^ (m2 << 1);
        assert_eq!(m3, 0x0f0f_0f0f);
        assert_eq!(m2, 0x3333_3333);
        assert_eq!(m1, 0x5555_5555);
    }

    #[test]
    fn test_all_ones_needs_six_bits() {
        // 32 does not fit in a 5-bit result field
        assert_eq!(popcount_2(u32::MAX), 32);
        assert_eq!(popcount_3(u32::MAX), 32);
        assert_eq!(popcount_4(u32::MAX), 32);
    }

    #[test]
    fn test_variants_agree() {
        let mut x = 0xdead_beefu32;
        for _ in 0..10_000 {
            let expected = x.count_ones();
            assert_eq!(popcount_2(x), expected, "x={:#010x}", x);
            assert_eq!(popcount_3(x), expected, "x={:#010x}", x);
            assert_eq!(popcount_4(x), expected, "x={:#010x}", x);
            x = x.rotate_left(7).wrapping_add(0x9e37_79b9);
        }
    }
}
