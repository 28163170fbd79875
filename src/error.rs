//! Error handling for popbench.
//!
//! Self-test mismatches are not errors: they disable a single entry and are
//! reported alongside the timings. Everything here aborts the run.

use thiserror::Error;

/// Errors that stop a benchmark run.
#[derive(Error, Debug)]
pub enum Error {
    /// A selected algorithm needs a CPU feature the host does not have
    #[error("{algorithm} requires the {capability} instruction, which this CPU does not support")]
    MissingCapability {
        /// Catalog name of the algorithm
        algorithm: &'static str,
        /// Feature that was probed
        capability: &'static str,
    },

    /// A name did not match any catalog entry
    #[error("unknown algorithm '{name}' (run with --list to see the catalog)")]
    UnknownAlgorithm {
        /// The name as given
        name: String,
    },

    /// A family name did not parse
    #[error("unknown family '{0}', expected one of: naive, bit-parallel, hakmem, divide-and-conquer, multiply, table, hardware")]
    UnknownFamily(String),

    /// The selection matched nothing runnable on this target
    #[error("no algorithms selected")]
    EmptySelection,

    /// Inconsistent configuration
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },

    /// Writing results failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for popbench operations.
pub type Result<T> = std::result::Result<T, Error>;
