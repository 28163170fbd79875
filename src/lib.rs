//! # Popbench
//!
//! A micro-benchmark suite comparing algorithms for the population count of a
//! 32-bit word.
//!
//! Every algorithm is a pure `u32 -> u32` function with its own technique: a
//! bit loop, byte and 6-bit lane summation, HAKMEM 169, divide-and-conquer
//! masking, multiply reductions, lookup tables and the hardware `popcnt`
//! instruction. The suite self-tests each one against fixed vectors and then
//! times it over a deterministic block of pseudo-random words.
//!
//! ## Quick Start
//!
//! ```
//! use popbench::{popcount, Config, Selection};
//!
//! assert_eq!(popcount::popcount_keane(0xea90_31e8), 14);
//!
//! let config = Config {
//!     iterations: 1,
//!     preheat: 0,
//!     selection: Selection::Names(vec!["popcount_keane".into()]),
//!     ..Config::default()
//! };
//! let mut out = Vec::new();
//! let report = popbench::run(&config, &mut out).unwrap();
//! assert!(report.mismatches.is_empty());
//! assert_eq!(report.timings.len(), 1);
//! ```
//!
//! ## Features
//!
//! - `serde` - Serialization support for [`Config`] and the report types
//! - `cli` - The `popbench` binary (default)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod catalog;
mod error;
pub mod opaque;
pub mod popcount;
pub mod random;
pub mod selftest;
pub mod suite;
pub mod timing;

pub use catalog::{AlgorithmInfo, Capability, Family, ALGORITHMS};
pub use error::{Error, Result};
pub use popcount::{Kernel, LookupTables};
pub use random::{random_block, Lcg, DEFAULT_SEED};
pub use selftest::{Mismatch, TEST_VECTORS};
pub use suite::{run, Report, Suite};
pub use timing::Timing;

/// Which catalog entries a run includes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Selection {
    /// Every entry compiled in for this target.
    #[default]
    All,
    /// Entries named explicitly, in catalog order.
    Names(Vec<String>),
    /// Entries belonging to any of the given families.
    Family(Vec<Family>),
}

/// Configuration for a benchmark run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Timed repetitions over the block before scaling by each entry's divisor
    pub iterations: u32,
    /// Number of words in the random block (default: 1000)
    pub block_size: usize,
    /// LCG seed for the random block
    pub seed: u64,
    /// Preheat repetitions before scaling by each entry's divisor (default: 50000)
    pub preheat: u32,
    /// Feed the running sum back into each input (default: true)
    pub chained: bool,
    /// Entries to run
    pub selection: Selection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 1,
            block_size: 1000,
            seed: DEFAULT_SEED,
            preheat: 50_000,
            chained: true,
            selection: Selection::All,
        }
    }
}

impl Config {
    /// Check the configuration before anything is generated.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidConfig {
                message: "block size must be at least 1".to_string(),
            });
        }
        if !random::is_valid_seed(self.seed) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "seed {:#x} is a multiple of the LCG modulus {}",
                    self.seed,
                    random::LCG_MODULUS
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let config = Config {
            block_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_degenerate_seed_rejected() {
        let config = Config {
            seed: random::LCG_MODULUS * 3,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
