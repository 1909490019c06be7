use num_bigint::{BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

use crate::decimal::pow10;
use crate::{Decimal, Precision};

/// Extra digits carried through series evaluation before the final rounding.
const GUARD_DIGITS: u32 = 10;

/// `atanh(1/n) * 10^digits`, each term truncated.
fn atanh_recip_fixed(n: u32, digits: u32) -> BigUint {
    let n_squared = BigUint::from(n) * n;
    let mut power = pow10(u64::from(digits)) / n;
    let mut sum = BigUint::zero();
    let mut k = 1u32;
    while !power.is_zero() {
        sum += &power / k;
        power /= &n_squared;
        k += 2;
    }
    sum
}

fn ln2_fixed(digits: u32) -> BigUint {
    atanh_recip_fixed(3, digits) * 2u32
}

impl Precision {
    fn fixed(self, value: BigUint, digits: u32) -> Decimal {
        self.round(&Decimal::from_parts(false, value, -i64::from(digits)))
    }

    /// `atanh(1/n)`.
    ///
    /// # Panics
    ///
    /// If `n < 2`, where the series does not converge.
    pub fn atanh_recip(self, n: u32) -> Decimal {
        assert!(n >= 2, "atanh(1/{n}) does not converge");
        let digits = self.digits() + GUARD_DIGITS;
        self.fixed(atanh_recip_fixed(n, digits), digits)
    }

    /// `ln(2) = 2 atanh(1/3)`.
    pub fn ln2(self) -> Decimal {
        let digits = self.digits() + GUARD_DIGITS;
        self.fixed(ln2_fixed(digits), digits)
    }

    /// `ln(10) = 3 ln(2) + ln(5/4) = 3 ln(2) + 2 atanh(1/9)`.
    pub fn ln10(self) -> Decimal {
        let digits = self.digits() + GUARD_DIGITS;
        self.fixed(
            ln2_fixed(digits) * 3u32 + atanh_recip_fixed(9, digits) * 2u32,
            digits,
        )
    }

    /// `e^x`, by halving the argument below one half, summing the Taylor series, and squaring
    /// back up.
    pub fn exp(self, x: &Decimal) -> Decimal {
        if x.is_zero() {
            return Decimal::one();
        }
        let magnitude = x.abs().to_f64();
        let halvings = if magnitude > 0.5 {
            (magnitude * 2.0).log2().ceil() as u32
        } else {
            0
        };
        let working = self.with_guard(GUARD_DIGITS + halvings);

        // x / 2^k == x * 5^k / 10^k, exactly
        let reduced = working.round(&Decimal::from_parts(
            x.negative,
            &x.coefficient * BigUint::from(5u32).pow(halvings),
            x.exponent - i64::from(halvings),
        ));

        let mut sum = Decimal::one();
        let mut term = Decimal::one();
        let mut k = 1u32;
        loop {
            term = working.quotient(&working.mul(&term, &reduced), &Decimal::from(k));
            if term.is_zero()
                || term.adjusted() < sum.adjusted() - i64::from(working.digits()) - 1
            {
                break;
            }
            sum = working.add(&sum, &term);
            k += 1;
        }

        for _ in 0..halvings {
            sum = working.mul(&sum, &sum);
        }
        self.round(&sum)
    }

    /// `10^y`. Exact (up to rounding to this precision) when `y` is integral.
    pub fn pow10(self, y: &Decimal) -> Decimal {
        let whole = y.floor();
        let fraction = y - &Decimal::from(whole.clone());
        let whole = whole.to_i64().unwrap_or(if whole.sign() == Sign::Minus {
            i64::MIN / 2
        } else {
            i64::MAX / 2
        });
        if fraction.is_zero() {
            return self.round(&Decimal::pow10(whole));
        }
        let working = self.with_guard(GUARD_DIGITS);
        let mantissa = working.exp(&working.mul(&fraction, &working.ln10()));
        self.round(&mantissa.scale_by_pow10(whole))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Decimal, Precision};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn prec(digits: u32) -> Precision {
        Precision::new(digits).unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(prec(30).ln2(), dec("0.693147180559945309417232121458"));
        assert_eq!(prec(20).ln2(), dec("0.69314718055994530942"));
        assert_eq!(prec(20).ln10(), dec("2.3025850929940456840"));
        assert_eq!(
            prec(30).atanh_recip(3),
            dec("0.346573590279972654708616060729")
        );
        assert_eq!(
            prec(30).atanh_recip(9),
            dec("0.111571775657104877883147545155")
        );
    }

    #[test]
    #[should_panic]
    fn test_atanh_recip_diverges() {
        prec(10).atanh_recip(1);
    }

    #[test]
    fn test_exp() {
        #[track_caller]
        fn case(digits: u32, x: &str, expected: &str) {
            let value = prec(digits).exp(&dec(x));
            assert_eq!(value, dec(expected), "exp({x}) gave {value}");
        }
        case(20, "1", "2.7182818284590452354");
        case(25, "0.5", "1.648721270700128146848651");
        case(25, "-1", "0.3678794411714423215955238");
        case(25, "2.302585", "9.999999070059586399281409");
        case(10, "0", "1");
    }

    #[test]
    fn test_pow10() {
        #[track_caller]
        fn case(digits: u32, y: &str, expected: &str) {
            let value = prec(digits).pow10(&dec(y));
            assert_eq!(value, dec(expected), "10^{y} gave {value}");
        }
        case(15, "0.5", "3.16227766016838");
        case(15, "9.35", "2238721138.56834");
        case(15, "-1.5", "0.0316227766016838");
        case(15, "3", "1000");
        case(28, "39", "1e39");
        case(15, "-2", "0.01");
    }

    #[test]
    fn test_pow10_rounds_to_precision() {
        // seven digits of 10^9.35 = 2238721138.568...
        assert_eq!(prec(7).pow10(&dec("9.35")).floor(), 2238721000u64.into());
    }
}
