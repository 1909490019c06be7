use std::cmp::Ordering;
use std::fmt::{self, Formatter};

use fixcap_decimal::Decimal;
use num_bigint::BigInt;
use num_traits::FromPrimitive;

/// A decimal fixed-point exponent, `units / 10^scale`.
///
/// Candidate exponents are stepped in whole units so that repeated stepping never drifts the way
/// binary floating point would, and the unit count is unbounded so that a grid may be refined to
/// any number of decimal places. Equality and ordering are numeric across scales.
#[derive(Debug, Clone)]
pub struct Exponent {
    units: BigInt,
    scale: u32,
}

impl Exponent {
    pub fn new(units: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            units: units.into(),
            scale,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::new(value, 0)
    }

    /// Rounds `value` to `scale` decimal places, half away from zero.
    ///
    /// Returns `None` for non-finite values, or when the scaled value is not finite.
    pub fn from_f64(value: f64, scale: u32) -> Option<Self> {
        let scaled = value * 10f64.powi(i32::try_from(scale).ok()?);
        Some(Self::new(BigInt::from_f64(scaled.round())?, scale))
    }

    pub fn units(&self) -> &BigInt {
        &self.units
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The same value on a grid with `scale` decimal places, or `None` if that grid is coarser.
    pub fn rescaled(&self, scale: u32) -> Option<Self> {
        let shift = scale.checked_sub(self.scale)?;
        Some(Self::new(&self.units * BigInt::from(10u32).pow(shift), scale))
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.units.clone(), -i64::from(self.scale))
    }

    /// Nearest `f64`. Lossy once the grid has more digits than an `f64` holds.
    pub fn to_f64(&self) -> f64 {
        self.to_decimal().to_f64()
    }
}

impl Ord for Exponent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_decimal().cmp(&other.to_decimal())
    }
}

impl PartialOrd for Exponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Exponent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Exponent {}

/// Every digit of the grid, `4.0` for `Exponent::new(40, 1)`.
impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_decimal(), f)
    }
}

impl serde::Serialize for Exponent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

/// An ascending pair of exponents.
///
/// Either the span that was searched without finding a collapse, or the interval whose upper end
/// is the first exponent at which one was found.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Range {
    pub low: Exponent,
    pub high: Exponent,
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}
