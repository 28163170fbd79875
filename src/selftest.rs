//! Correctness check run before any timing.

#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;

use crate::popcount::Kernel;

/// Known `(input, bit count)` pairs, checked in order.
pub const TEST_VECTORS: &[(u32, u32)] = &[
    (0x0000_0080, 1),
    (0x0000_00f0, 4),
    (0x0000_8000, 1),
    (0x0000_f000, 4),
    (0x0080_0000, 1),
    (0x00f0_0000, 4),
    (0x8000_0000, 1),
    (0xf000_0000, 4),
    (0xff00_0000, 8),
    (0x0000_00ff, 8),
    (0x01fe_0000, 8),
    (0xea90_31e8, 14),
    (0x2e8e_b2b2, 16),
    (0x9b8b_e5b7, 20),
    (0xffff_ffff, 32),
    (0x0000_0000, 0),
];

/// First failing vector for an algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Mismatch {
    /// Name of the algorithm
    pub algorithm: String,
    /// 1-based index into [`TEST_VECTORS`]
    pub case: usize,
    pub input: u32,
    pub actual: u32,
    pub expected: u32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed case {}: {:#010x} -> {} != {}: abandoning",
            self.algorithm, self.case, self.input, self.actual, self.expected
        )
    }
}

/// Run `kernel` over [`TEST_VECTORS`], stopping at the first wrong count.
pub fn first_mismatch<K: Kernel + ?Sized>(name: &str, kernel: &K) -> Option<Mismatch> {
    TEST_VECTORS
        .iter()
        .enumerate()
        .find_map(|(i, &(input, expected))| {
            let actual = kernel.count(input);
            (actual != expected).then(|| Mismatch {
                algorithm: name.to_string(),
                case: i + 1,
                input,
                actual,
                expected,
            })
        })
}
