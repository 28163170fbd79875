//! Deterministic input generation.
//!
//! The block of words every algorithm is timed against comes from a
//! multiplicative (Lehmer) linear congruential generator with 64-bit state.
//! A fixed seed and fixed constants make every run, on every host, time the
//! same inputs.

/// LCG multiplier.
pub const LCG_MULTIPLIER: u64 = 279_470_273;

/// LCG modulus, the prime `2^32 - 5`.
pub const LCG_MODULUS: u64 = 4_294_967_291;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x2545_F491;

/// Whether `seed` yields a non-degenerate sequence.
///
/// A state congruent to zero stays zero forever.
#[inline]
pub fn is_valid_seed(seed: u64) -> bool {
    seed % LCG_MODULUS != 0
}

/// Multiplicative linear congruential generator: `state = A * state mod M`.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a generator from `seed`.
    ///
    /// The seed is reduced modulo [`LCG_MODULUS`]; check it with
    /// [`is_valid_seed`] first if it is not a constant.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Advance and return the new state truncated to 32 bits.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        // state < 2^32 and A < 2^29, so the product fits in 64 bits
        self.state = (LCG_MULTIPLIER * self.state) % LCG_MODULUS;
        self.state as u32
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Iterator for Lcg {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        Some(self.next_u32())
    }
}

/// Generate the benchmark input block.
pub fn random_block(len: usize, seed: u64) -> Vec<u32> {
    Lcg::new(seed).take(len).collect()
}
