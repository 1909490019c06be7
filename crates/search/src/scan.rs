use fixcap_decimal::Decimal;
use num_traits::Signed;
use slog::{debug, info, warn};

use crate::{ConfigurationError, Exponent, Range, Searcher, Sequence};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    /// Last candidate exponent, inclusive.
    pub n: f64,
    pub start: f64,
    pub step: f64,
    pub offset: u64,
}

impl ScanParams {
    pub const DEFAULT_START: f64 = 1.0;
    pub const DEFAULT_STEP: f64 = 1.0;
    pub const DEFAULT_OFFSET: u64 = 10;

    pub fn new(n: f64) -> Self {
        Self {
            n,
            start: Self::DEFAULT_START,
            step: Self::DEFAULT_STEP,
            offset: Self::DEFAULT_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Collapse first appeared at `range.high`; `sequence` is the window there.
    Found { sequence: Sequence, range: Range },
    /// Nothing collapsed anywhere in `range`; `sequence` is the window at the last candidate.
    NotFound { sequence: Sequence, range: Range },
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn range(&self) -> &Range {
        match self {
            Self::Found { range, .. } | Self::NotFound { range, .. } => range,
        }
    }

    pub fn sequence(&self) -> &Sequence {
        match self {
            Self::Found { sequence, .. } | Self::NotFound { sequence, .. } => sequence,
        }
    }
}

/// Candidate exponents `start, start + step, ..., n`, all on one decimal grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Grid {
    start: Exponent,
    n: Exponent,
    step: Exponent,
    offset: u64,
}

impl Grid {
    /// Rounds the parameters onto a grid with one more decimal place than the step's own.
    pub(crate) fn new(params: &ScanParams) -> Result<Self, ConfigurationError> {
        let step = params.step;
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigurationError::InvalidStep { step });
        }
        let scale = (-step.log10() + 1.0).round().max(0.0) as u32;
        let snap = |value: f64| {
            Exponent::from_f64(value, scale).ok_or(ConfigurationError::NonFiniteBound { value })
        };

        let grid = Self {
            start: snap(params.start)?,
            n: snap(params.n)?,
            step: snap(step)?,
            offset: params.offset,
        };
        if !grid.step.units().is_positive() {
            return Err(ConfigurationError::InvalidStep { step });
        }
        Ok(grid)
    }

    /// The grid one decimal place finer spanning `range`, whose ends lie on this grid.
    pub(crate) fn refined(&self, range: &Range) -> Self {
        let scale = self.step.scale() + 1;
        let rescale = |exponent: &Exponent| {
            debug_assert_eq!(exponent.scale(), self.step.scale());
            Exponent::new(exponent.units() * 10u32, scale)
        };
        Self {
            start: rescale(&range.low),
            n: rescale(&range.high),
            // the same unit count one place further right is a tenth of the step
            step: Exponent::new(self.step.units().clone(), scale),
            offset: self.offset,
        }
    }
}

impl Searcher {
    /// Tries every candidate exponent from `start` to `n` in ascending order and stops at the
    /// first whose window collapses.
    pub fn scan(&self, params: &ScanParams) -> Result<Outcome, ConfigurationError> {
        self.scan_grid(&Grid::new(params)?)
    }

    pub(crate) fn scan_grid(&self, grid: &Grid) -> Result<Outcome, ConfigurationError> {
        let Grid {
            start,
            n,
            step,
            offset,
        } = grid;
        let scale = step.scale();
        debug!(self.log, "Checking from {start} to {n} in {step} steps, offset {offset}");

        let base = Decimal::one();
        let mut last = None;
        let mut units = start.units().clone();
        while units <= *n.units() {
            let candidate = Exponent::new(units.clone(), scale);
            debug!(self.log, "Checking {candidate}");

            let sequence = self.generate(&candidate, *offset, &base)?;
            if let Some(collapse) = sequence.find_collapse() {
                let range = Range {
                    low: Exponent::new(&units - step.units(), scale),
                    high: candidate,
                };
                info!(
                    self.log,
                    "Sequence becomes indistinguishable between {} and {}", range.low, range.high
                );
                debug!(self.log, "{collapse}");
                self.trace(&sequence);
                return Ok(Outcome::Found { sequence, range });
            }
            last = Some(sequence);
            units += step.units();
        }

        let Some(sequence) = last else {
            return Err(ConfigurationError::EmptyRange {
                start: start.clone(),
                n: n.clone(),
            });
        };
        warn!(
            self.log,
            "Sequence remained distinguishable between {start} and {n}, increase range"
        );
        self.trace(&sequence);
        Ok(Outcome::NotFound {
            sequence,
            range: Range {
                low: start.clone(),
                high: n.clone(),
            },
        })
    }
}
