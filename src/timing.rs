//! Preheat-then-measure timing of one kernel.

#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;
use std::time::Instant;

use crate::popcount::Kernel;

/// Repetitions after scaling by `divisor`. A zero divisor counts as one.
#[inline]
pub fn scaled(total: u32, divisor: u32) -> u32 {
    total / divisor.max(1)
}

/// Timed repetitions for an entry.
///
/// Never zero, so every entry reports a line even when `iterations` is
/// smaller than its divisor.
#[inline]
pub fn timed_repetitions(iterations: u32, divisor: u32) -> u32 {
    scaled(iterations, divisor).max(1)
}

/// Measurement for one algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Timing {
    /// Name of the algorithm
    pub algorithm: String,
    /// Divisor applied to the configured repetitions
    pub divisor: u32,
    /// Timed passes over the block
    pub repetitions: u32,
    /// Calls made in the timed run
    pub calls: u64,
    /// Wall-clock time of the timed run
    pub elapsed_ns: u64,
    /// Wrapping sum of the preheat and timed results
    pub checksum: u32,
}

impl Timing {
    /// Whole milliseconds of the timed run.
    pub fn msecs(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    /// Mean nanoseconds per call.
    pub fn nsecs_per_call(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.elapsed_ns as f64 / self.calls as f64
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} iters in {} msecs for {:.3} nsecs/iter",
            self.algorithm,
            self.calls,
            self.msecs(),
            self.nsecs_per_call()
        )
    }
}

/// Parameters shared by every timed entry.
#[derive(Debug, Clone, Copy)]
pub struct TimingParams {
    pub iterations: u32,
    pub preheat: u32,
    pub chained: bool,
}

/// Preheat `kernel`, then time `iterations / divisor` passes over `block`.
pub fn time_kernel<K: Kernel + ?Sized>(
    name: &str,
    divisor: u32,
    kernel: &K,
    block: &[u32],
    params: TimingParams,
) -> Timing {
    let preheat = scaled(params.preheat, divisor);
    let warm = kernel.drive(preheat, block, params.chained);

    let repetitions = timed_repetitions(params.iterations, divisor);
    let start = Instant::now();
    let result = kernel.drive(repetitions, block, params.chained);
    let elapsed = start.elapsed();

    let timing = Timing {
        algorithm: name.to_string(),
        divisor,
        repetitions,
        calls: u64::from(repetitions) * block.len() as u64,
        elapsed_ns: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
        checksum: warm.wrapping_add(result),
    };
    log::info!(
        "{}: {} reps (+{} preheat) in {:?}",
        name,
        repetitions,
        preheat,
        elapsed
    );
    timing
}
