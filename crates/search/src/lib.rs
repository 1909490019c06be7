#![deny(unused_must_use)]

//! Searches for the exponent at which a tail window of the alternating harmonic series stops
//! being distinguishable from itself at a given decimal precision, and turns that boundary into
//! an estimate of how many elements a fixed-point representation can index.
//!
//! "Collapse" throughout this crate means that two computed values came out exactly equal: the
//! working precision ran out of digits to tell them apart. It is detected with exact equality,
//! never with a tolerance, and it is a search heuristic, not a proof that the representation
//! fails at that point.

mod capacity;
mod collapse;
mod constants;
mod exponent;
mod refine;
mod scan;
mod sequence;

use std::sync::Arc;

use fixcap_decimal::Precision;
use num_bigint::BigUint;
use slog::Logger;

pub use capacity::{Estimate, capacity_bits, estimate_capacity};
pub use collapse::{Collapse, Differences, collapsed, find_collapse};
pub use constants::Constants;
pub use exponent::{Exponent, Range};
pub use scan::{Outcome, ScanParams};
pub use sequence::{Sample, Sequence};

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "offset {offset} is too large for exponent {exponent} (threshold {threshold}), decrease the offset or increase the exponent"
    )]
    OffsetTooLarge {
        offset: u64,
        exponent: Exponent,
        threshold: BigUint,
    },
    #[error("offset must be positive")]
    ZeroOffset,
    #[error("no candidate exponents from {start} to {n}")]
    EmptyRange { start: Exponent, n: Exponent },
    #[error("invalid exponent step {step}, expected a positive finite number")]
    InvalidStep { step: f64 },
    #[error("invalid exponent bound {value}, expected a finite number")]
    NonFiniteBound { value: f64 },
}

/// Runs searches at a single working precision.
///
/// The precision never changes for the lifetime of a searcher. Searchers at different precisions
/// may share one [`Constants`] cache.
pub struct Searcher {
    precision: Precision,
    constants: Arc<Constants>,
    log: Logger,
}

impl Searcher {
    pub fn new(precision: Precision, log: Logger) -> Self {
        Self::with_constants(precision, Arc::default(), log)
    }

    pub fn with_constants(precision: Precision, constants: Arc<Constants>, log: Logger) -> Self {
        Self {
            precision,
            constants,
            log,
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn constants(&self) -> &Arc<Constants> {
        &self.constants
    }
}

#[cfg(test)]
pub(crate) fn test_searcher(digits: u32) -> Searcher {
    Searcher::new(
        Precision::new(digits).unwrap(),
        Logger::root(slog::Discard, slog::o!()),
    )
}
