use std::cmp::Ordering;
use std::fmt::{self, Formatter};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

/// Largest exponent magnitude accepted when parsing, the bound decimal contexts use on 32-bit
/// targets.
pub const MAX_EXPONENT: i64 = 999_999_999;

/// Returns `10^exponent`.
///
/// # Panics
///
/// If `exponent` does not fit in a `u32`. Such a power has billions of digits.
pub(crate) fn pow10(exponent: u64) -> BigUint {
    let Ok(exponent) = u32::try_from(exponent) else {
        panic!("10^{exponent} has too many digits to materialize");
    };
    BigUint::from(10u32).pow(exponent)
}

/// Returns the number of decimal digits in `value`. Zero has one digit.
pub(crate) fn digit_count(value: &BigUint) -> u64 {
    if value.is_zero() {
        return 1;
    }
    // 2^(bits - 1) <= value < 2^bits, so the digit count is either this or one more.
    let estimate = ((value.bits() - 1) as f64 * std::f64::consts::LOG10_2) as u64 + 1;
    if *value >= pow10(estimate) {
        estimate + 1
    } else {
        estimate
    }
}

/// `±coefficient * 10^exponent`.
///
/// Equality and ordering are numeric: `1.0 == 1.00`.
#[derive(Clone)]
pub struct Decimal {
    pub(crate) negative: bool,
    pub(crate) coefficient: BigUint,
    pub(crate) exponent: i64,
}

impl Decimal {
    pub(crate) fn from_parts(negative: bool, coefficient: BigUint, exponent: i64) -> Self {
        Self {
            negative: negative && !coefficient.is_zero(),
            coefficient,
            exponent,
        }
    }

    pub fn new(coefficient: impl Into<BigInt>, exponent: i64) -> Self {
        let coefficient = coefficient.into();
        Self::from_parts(
            coefficient.sign() == Sign::Minus,
            coefficient.magnitude().clone(),
            exponent,
        )
    }

    pub fn zero() -> Self {
        Self::from_parts(false, BigUint::zero(), 0)
    }

    pub fn one() -> Self {
        Self::from(1u32)
    }

    /// Exactly `10^exponent`.
    pub fn pow10(exponent: i64) -> Self {
        Self::from_parts(false, BigUint::from(1u32), exponent)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn abs(&self) -> Self {
        Self::from_parts(false, self.coefficient.clone(), self.exponent)
    }

    /// Multiplies by `10^n`, exactly.
    pub fn scale_by_pow10(&self, n: i64) -> Self {
        Self::from_parts(self.negative, self.coefficient.clone(), self.exponent + n)
    }

    /// Exponent of the most significant digit, i.e. `floor(log10(|self|))` for non-zero values.
    pub fn adjusted(&self) -> i64 {
        self.exponent + digit_count(&self.coefficient) as i64 - 1
    }

    fn signed(&self) -> BigInt {
        BigInt::from_biguint(
            if self.negative { Sign::Minus } else { Sign::Plus },
            self.coefficient.clone(),
        )
    }

    /// Largest integer not greater than `self`.
    pub fn floor(&self) -> BigInt {
        if self.exponent >= 0 {
            return self.signed() * BigInt::from(pow10(self.exponent as u64));
        }
        if self.adjusted() < 0 {
            // |self| < 1
            return if self.negative && !self.is_zero() {
                BigInt::from(-1)
            } else {
                BigInt::zero()
            };
        }
        let divisor = pow10(self.exponent.unsigned_abs());
        let truncated = &self.coefficient / &divisor;
        let exact = (&self.coefficient % &divisor).is_zero();
        if self.negative {
            let truncated = -BigInt::from(truncated);
            if exact { truncated } else { truncated - 1 }
        } else {
            BigInt::from(truncated)
        }
    }

    /// Nearest `f64`, saturating to infinity outside its range.
    pub fn to_f64(&self) -> f64 {
        let sign = if self.negative { "-" } else { "" };
        format!("{sign}{}e{}", self.coefficient, self.exponent)
            .parse()
            .expect("always a valid float literal")
    }
}

/// Brings both operands to the smaller exponent.
fn align(lhs: &Decimal, rhs: &Decimal) -> (BigInt, BigInt, i64) {
    let exponent = lhs.exponent.min(rhs.exponent);
    let scale = |value: &Decimal| {
        let shift = (value.exponent - exponent) as u64;
        if shift == 0 {
            value.signed()
        } else {
            value.signed() * BigInt::from(pow10(shift))
        }
    };
    (scale(lhs), scale(rhs), exponent)
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Decimal {
                fn from(value: $ty) -> Self {
                    Self::new(value, 0)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, BigInt);

impl From<BigUint> for Decimal {
    fn from(value: BigUint) -> Self {
        Self::from_parts(false, value, 0)
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        let (lhs, rhs, exponent) = align(self, rhs);
        Decimal::new(lhs + rhs, exponent)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        self + &-rhs
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal::from_parts(
            self.negative != rhs.negative,
            &self.coefficient * &rhs.coefficient,
            self.exponent + rhs.exponent,
        )
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident::$method:ident),*) => {
        $(
            impl $imp for Decimal {
                type Output = Decimal;

                fn $method(self, rhs: Decimal) -> Decimal {
                    $imp::$method(&self, &rhs)
                }
            }

            impl $imp<&Decimal> for Decimal {
                type Output = Decimal;

                fn $method(self, rhs: &Decimal) -> Decimal {
                    $imp::$method(&self, rhs)
                }
            }
        )*
    };
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::from_parts(!self.negative, self.coefficient.clone(), self.exponent)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::from_parts(!self.negative, self.coefficient, self.exponent)
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = |value: &Decimal| match (value.is_zero(), value.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        };
        match sign(self).cmp(&sign(other)) {
            Ordering::Equal if sign(self) == 0 => return Ordering::Equal,
            Ordering::Equal => {}
            ordering => return ordering,
        }
        // different leading digit positions decide without aligning the coefficients
        match self.adjusted().cmp(&other.adjusted()) {
            Ordering::Equal => {}
            ordering if self.negative => return ordering.reverse(),
            ordering => return ordering,
        }
        let (lhs, rhs, _) = align(self, other);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

#[derive(Debug, thiserror::Error)]
#[error("invalid decimal literal: {value:?}")]
pub struct ParseDecimalError {
    value: String,
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts `[+-]digits[.digits][(e|E)[+-]digits]`, where either side of the point may be
    /// empty but not both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError {
            value: s.to_owned(),
        };
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                (mantissa, exponent.parse::<i64>().map_err(|_| invalid())?)
            }
            None => (rest, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if (whole.is_empty() && fraction.is_empty())
            || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let coefficient = format!("{whole}{fraction}")
            .parse::<BigUint>()
            .map_err(|_| invalid())?;
        if exponent.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
            return Err(invalid());
        }
        let exponent = exponent - fraction.len() as i64;
        Ok(Self::from_parts(negative, coefficient, exponent))
    }
}

/// Formats like the standard decimal-to-string conversion: plain notation while the exponent is
/// not positive and the value is not too small, scientific notation otherwise.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let digits = self.coefficient.to_string();
        let adjusted = self.exponent + digits.len() as i64 - 1;
        if self.exponent <= 0 && adjusted >= -6 {
            let point = digits.len() as i64 + self.exponent;
            if self.exponent == 0 {
                f.write_str(&digits)
            } else if point > 0 {
                let (whole, fraction) = digits.split_at(point as usize);
                write!(f, "{whole}.{fraction}")
            } else {
                write!(f, "0.{:0>width$}", digits, width = digits.len() + (-point) as usize)
            }
        } else {
            let (first, rest) = digits.split_at(1);
            f.write_str(first)?;
            if !rest.is_empty() {
                write!(f, ".{rest}")?;
            }
            write!(f, "E{adjusted:+}")
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
