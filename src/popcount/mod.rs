//! Population count algorithms for 32-bit words.
//!
//! Every function here maps a `u32` to its number of set bits (0-32). They
//! differ only in technique:
//!
//! - [`naive`]: one bit per iteration
//! - [`parallel`]: byte and 6-bit lane summation, looped and unrolled
//! - [`hakmem`]: HAKMEM 169, with hardware `% 63` or Keane's reduction
//! - [`divide`]: divide-and-conquer over 2-, 3- and 4-bit groups
//! - [`multiply`]: multiply-based lane folding
//! - [`table`]: 8-bit and 16-bit lookup tables
//! - [`hardware`]: `count_ones` and the `popcnt` instruction
//!
//! The [`Kernel`] trait is the seam between an algorithm and the timing
//! loop. Each zero-sized kernel type instantiates [`drive`] separately, so
//! the algorithm is inlined into its own loop.

pub mod divide;
pub mod hakmem;
pub mod hardware;
pub mod multiply;
pub mod naive;
pub mod parallel;
pub mod table;

pub use divide::{popcount_2, popcount_3, popcount_4};
pub use hakmem::{popcount_hakmem, popcount_keane, remu63};
pub use hardware::{popcount_builtin, Popcnt};
pub use multiply::{popcount_anderson, popcount_mult};
pub use naive::popcount_naive;
pub use parallel::{popcount_6, popcount_6_unrolled, popcount_8, popcount_8_unrolled};
pub use table::{LookupTables, Tabular16, Tabular8};

/// A popcount algorithm bound to whatever state it reads.
pub trait Kernel {
    /// Count the set bits of `x`.
    fn count(&self, x: u32) -> u32;

    /// Sum `count` over `block`, `reps` times. See [`drive`].
    fn drive(&self, reps: u32, block: &[u32], chained: bool) -> u32 {
        drive(reps, block, chained, |x| self.count(x))
    }
}

impl<K: Kernel + ?Sized> Kernel for &K {
    #[inline(always)]
    fn count(&self, x: u32) -> u32 {
        (**self).count(x)
    }

    fn drive(&self, reps: u32, block: &[u32], chained: bool) -> u32 {
        (**self).drive(reps, block, chained)
    }
}

impl<K: Kernel + ?Sized> Kernel for Box<K> {
    #[inline(always)]
    fn count(&self, x: u32) -> u32 {
        (**self).count(x)
    }

    fn drive(&self, reps: u32, block: &[u32], chained: bool) -> u32 {
        (**self).drive(reps, block, chained)
    }
}

/// Accumulate `count` over every word of `block`, `reps` times.
///
/// With `chained` set, the running sum is XORed into each input before it is
/// counted. Every call then depends on the previous one, and the optimizer
/// cannot hoist or batch them. The sum wraps.
#[inline(always)]
pub fn drive<F>(reps: u32, block: &[u32], chained: bool, count: F) -> u32
where
    F: Fn(u32) -> u32,
{
    let mut sum = 0u32;
    if chained {
        for _ in 0..reps {
            for &x in block {
                sum = sum.wrapping_add(count(x ^ sum));
            }
        }
    } else {
        for _ in 0..reps {
            for &x in block {
                sum = sum.wrapping_add(count(x));
            }
        }
    }
    sum
}

macro_rules! kernels {
    ($($(#[$meta:meta])* $kernel:ident => $f:path),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $kernel;

            impl Kernel for $kernel {
                #[inline(always)]
                fn count(&self, x: u32) -> u32 {
                    $f(x)
                }
            }
        )*
    };
}

kernels! {
    /// Kernel for [`popcount_naive`].
    Naive => popcount_naive,
    /// Kernel for [`popcount_8`].
    Parallel8 => popcount_8,
    /// Kernel for [`popcount_8_unrolled`].
    Parallel8Unrolled => popcount_8_unrolled,
    /// Kernel for [`popcount_6`].
    Parallel6 => popcount_6,
    /// Kernel for [`popcount_6_unrolled`].
    Parallel6Unrolled => popcount_6_unrolled,
    /// Kernel for [`popcount_hakmem`].
    Hakmem => popcount_hakmem,
    /// Kernel for [`popcount_keane`].
    Keane => popcount_keane,
    /// Kernel for [`popcount_anderson`].
    Anderson => popcount_anderson,
    /// Kernel for [`popcount_2`].
    DivideBy2 => popcount_2,
    /// Kernel for [`popcount_3`].
    DivideBy3 => popcount_3,
    /// Kernel for [`popcount_4`].
    DivideBy4 => popcount_4,
    /// Kernel for [`popcount_mult`].
    Mult => popcount_mult,
    /// Kernel for [`popcount_builtin`].
    Builtin => popcount_builtin,
}
