use std::f64::consts::LOG2_10;

use fixcap_decimal::Precision;
use slog::{Logger, info, warn};

use crate::{ConfigurationError, Exponent, Outcome, Range, ScanParams, Searcher};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Estimate {
    pub precision: Precision,
    pub depth: u32,
    /// The refined interval whose upper end first collapsed.
    pub boundary: Range,
    /// `log2` of the number of items that stay distinguishable.
    pub bits: f64,
}

/// `log2(10^(low + 1))`, the bit count of the last window known to be distinguishable.
pub fn capacity_bits(low: &Exponent) -> f64 {
    (low.to_f64() + 1.0) * LOG2_10
}

impl Searcher {
    /// Refines from exponent 1 up to `10 + precision` and converts the boundary into bits.
    ///
    /// Returns `None` when no collapse was found in that span.
    pub fn estimate_capacity(&self, depth: u32) -> Result<Option<Estimate>, ConfigurationError> {
        let params = ScanParams::new(f64::from(10 + self.precision.digits()));
        let boundary = match self.refine(&params, depth)? {
            Outcome::Found { range, .. } => range,
            Outcome::NotFound { range, .. } => {
                warn!(
                    self.log,
                    "No boundary between {} and {}, increase the depth or the initial scan span",
                    range.low,
                    range.high
                );
                return Ok(None);
            }
        };

        let bits = capacity_bits(&boundary.low);
        info!(self.log, "Boundary at {boundary} gives 2^{bits} items");
        Ok(Some(Estimate {
            precision: self.precision,
            depth,
            boundary,
            bits,
        }))
    }
}

pub fn estimate_capacity(
    precision: Precision,
    depth: u32,
    log: &Logger,
) -> Result<Option<Estimate>, ConfigurationError> {
    Searcher::new(precision, log.clone()).estimate_capacity(depth)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::LOG2_10;

    use super::capacity_bits;
    use crate::{ConfigurationError, Exponent, Range, test_searcher};

    #[test]
    fn test_capacity_bits() {
        assert_eq!(capacity_bits(&Exponent::integer(0)), LOG2_10);
        assert!((capacity_bits(&Exponent::new(834, 2)) - 9.34 * LOG2_10).abs() < 1e-12);
    }

    #[test]
    fn test_estimate() {
        let estimate = test_searcher(10).estimate_capacity(3).unwrap().unwrap();
        assert!(estimate.bits.is_finite() && estimate.bits > 0.0);
        assert_eq!(
            estimate.boundary,
            Range {
                low: Exponent::new(234, 2),
                high: Exponent::new(235, 2),
            }
        );
        assert!((estimate.bits - (estimate.boundary.low.to_f64() + 1.0) * LOG2_10).abs() < 1e-12);
        assert_eq!(estimate.depth, 3);
        assert_eq!(estimate.precision.digits(), 10);
    }

    #[test]
    fn test_deep_estimate() {
        let estimate = test_searcher(15).estimate_capacity(18).unwrap().unwrap();
        assert_eq!(estimate.boundary.high.scale(), 18);
        assert!((estimate.bits - 5.0211065684321 * LOG2_10).abs() < 1e-9);
    }

    #[test]
    fn test_increases_with_precision() {
        let low = test_searcher(10).estimate_capacity(3).unwrap().unwrap();
        let high = test_searcher(20).estimate_capacity(3).unwrap().unwrap();
        assert!(low.bits < high.bits);
    }

    #[test]
    fn test_low_precision() {
        let estimate = test_searcher(5).estimate_capacity(1).unwrap().unwrap();
        assert_eq!(
            estimate.boundary,
            Range {
                low: Exponent::integer(0),
                high: Exponent::integer(1),
            }
        );
        assert_eq!(estimate.bits, LOG2_10);

        // refining below exponent 1 leaves no room for the window
        assert!(matches!(
            test_searcher(5).estimate_capacity(3),
            Err(ConfigurationError::OffsetTooLarge { .. })
        ));
    }
}
