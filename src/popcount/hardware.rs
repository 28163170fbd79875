//! Hardware-assisted counting.
//!
//! [`popcount_builtin`] is whatever `u32::count_ones` lowers to for the
//! compilation target. It is a SWAR sequence on baseline x86_64 and a single
//! instruction when `popcnt` is enabled at build time. [`Popcnt`] always
//! executes the instruction, after a runtime check that the CPU has it.

use super::{drive, Kernel};

/// The compiler's own population count.
#[inline(always)]
pub fn popcount_builtin(n: u32) -> u32 {
    n.count_ones()
}

/// Proof that the running CPU implements the `popcnt` instruction.
///
/// Only [`Popcnt::detect`] can construct one.
#[derive(Clone, Copy, Debug)]
pub struct Popcnt {
    _detected: (),
}

impl Popcnt {
    /// Name of the probed CPU feature.
    pub const FEATURE: &'static str = "popcnt";

    /// Whether this build contains the `popcnt` kernel at all.
    pub const fn is_compiled_in() -> bool {
        cfg!(any(target_arch = "x86", target_arch = "x86_64"))
    }

    /// Probe the CPU.
    pub fn detect() -> Option<Self> {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if std::arch::is_x86_feature_detected!("popcnt") {
                return Some(Self { _detected: () });
            }
        }
        None
    }

    /// Count with the `popcnt` instruction.
    #[inline(always)]
    pub fn popcount(self, n: u32) -> u32 {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            // SAFETY: `self` exists only if detection succeeded.
            unsafe { x86::popcount_popcnt(n) }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            // unreachable: detect() never returns a token here
            n.count_ones()
        }
    }
}

impl Kernel for Popcnt {
    #[inline(always)]
    fn count(&self, x: u32) -> u32 {
        self.popcount(x)
    }

    fn drive(&self, reps: u32, block: &[u32], chained: bool) -> u32 {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            // SAFETY: `self` exists only if detection succeeded.
            unsafe { x86::drive_popcnt(reps, block, chained) }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            drive(reps, block, chained, |x| self.popcount(x))
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::_popcnt32;
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::_popcnt32;

    use super::drive;

    /// Single-word `popcnt`.
    ///
    /// # Safety
    ///
    /// The CPU must support `popcnt`.
    #[target_feature(enable = "popcnt")]
    #[inline]
    pub unsafe fn popcount_popcnt(n: u32) -> u32 {
        _popcnt32(n as i32) as u32
    }

    /// The block driver, compiled with `popcnt` enabled so the count is
    /// inlined as one instruction.
    ///
    /// # Safety
    ///
    /// The CPU must support `popcnt`.
    #[target_feature(enable = "popcnt")]
    pub unsafe fn drive_popcnt(reps: u32, block: &[u32], chained: bool) -> u32 {
        drive(reps, block, chained, |x| x.count_ones())
    }
}
