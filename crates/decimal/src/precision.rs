use std::cmp::Ordering;
use std::fmt::{self, Formatter};
use std::num::NonZeroU32;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::Decimal;
use crate::decimal::{digit_count, pow10};

#[derive(Debug, thiserror::Error)]
#[error("division by zero")]
pub struct DivisionByZero;

/// Number of significant decimal digits kept by rounded operations.
///
/// Every rounding is half-even, and every rounded operation computes the exact result before
/// rounding it once, so results are correctly rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Precision(NonZeroU32);

fn is_odd(value: &BigUint) -> bool {
    !(value % 2u32).is_zero()
}

impl Precision {
    /// The precision decimal contexts conventionally start with.
    pub const DEFAULT: Self = Self(NonZeroU32::new(28).unwrap());

    pub const fn new(digits: u32) -> Option<Self> {
        match NonZeroU32::new(digits) {
            Some(digits) => Some(Self(digits)),
            None => None,
        }
    }

    pub const fn digits(self) -> u32 {
        self.0.get()
    }

    /// This precision plus `extra` digits.
    pub fn with_guard(self, extra: u32) -> Self {
        Self(self.0.saturating_add(extra))
    }

    pub fn round(self, value: &Decimal) -> Decimal {
        let limit = u64::from(self.digits());
        let digits = digit_count(&value.coefficient);
        if digits <= limit {
            return value.clone();
        }
        let dropped = digits - limit;
        let divisor = pow10(dropped);
        let mut kept = &value.coefficient / &divisor;
        let remainder = &value.coefficient % &divisor;
        let half = &divisor >> 1u32;
        let round_up = match remainder.cmp(&half) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => is_odd(&kept),
        };
        let mut exponent = value.exponent + dropped as i64;
        if round_up {
            kept += 1u32;
            // 99..9 carried into 100..0
            if digit_count(&kept) > limit {
                kept /= 10u32;
                exponent += 1;
            }
        }
        Decimal::from_parts(value.negative, kept, exponent)
    }

    pub fn add(self, lhs: &Decimal, rhs: &Decimal) -> Decimal {
        self.round(&(lhs + rhs))
    }

    pub fn sub(self, lhs: &Decimal, rhs: &Decimal) -> Decimal {
        self.round(&(lhs - rhs))
    }

    pub fn mul(self, lhs: &Decimal, rhs: &Decimal) -> Decimal {
        self.round(&(lhs * rhs))
    }

    pub fn div(self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, DivisionByZero> {
        if rhs.is_zero() {
            return Err(DivisionByZero);
        }
        Ok(self.quotient(lhs, rhs))
    }

    /// `lhs / rhs` for a non-zero `rhs`.
    pub(crate) fn quotient(self, lhs: &Decimal, rhs: &Decimal) -> Decimal {
        debug_assert!(!rhs.is_zero());
        if lhs.is_zero() {
            return Decimal::zero();
        }
        // enough digits that the integer quotient has at least one more than we keep
        let shift = (i64::from(self.digits()) + 1 + digit_count(&rhs.coefficient) as i64
            - digit_count(&lhs.coefficient) as i64)
            .max(0) as u64;
        let numerator = &lhs.coefficient * pow10(shift);
        let mut quotient = &numerator / &rhs.coefficient;
        let mut exponent = lhs.exponent - rhs.exponent - shift as i64;
        if !(&numerator % &rhs.coefficient).is_zero() {
            // sticky digit: an inexact quotient must never look like an exact tie
            quotient = quotient * 10u32 + 1u32;
            exponent -= 1;
        }
        self.round(&Decimal::from_parts(
            lhs.negative != rhs.negative,
            quotient,
            exponent,
        ))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
