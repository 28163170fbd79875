//! The reference algorithm: one bit at a time.

/// Count set bits by testing the low bit and shifting right until the
/// word is empty.
///
/// Runs at most 32 iterations, fewer when the high bits are clear. This is
/// also the function the lookup tables are built from.
#[inline(always)]
pub fn popcount_naive(mut n: u32) -> u32 {
    let mut c = 0;
    while n > 0 {
        c += n & 1;
        n >>= 1;
    }
    c
}
