//! Optimizer barriers used only for measurement.
//!
//! LLVM recognizes some bit-counting idioms (notably the SWAR fold that ends
//! in a multiply by `0x01010101`) and replaces them with a single `popcnt`.
//! The benchmark would then time the instruction and not the algorithm.
//! Constants routed through here stay opaque to that rewrite.
//! The computed values do not change.

use core::hint::black_box;

/// Return `x` unchanged, hidden from constant folding and idiom recognition.
#[inline(always)]
pub fn opaque_u32(x: u32) -> u32 {
    black_box(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_pass_through() {
        assert_eq!(opaque_u32(0x0101_0101), 0x0101_0101);
        assert_eq!(opaque_u32(u32::MAX), u32::MAX);
    }
}
