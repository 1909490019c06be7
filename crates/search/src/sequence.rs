use fixcap_decimal::Decimal;
use num_bigint::BigUint;
use num_traits::Zero;
use slog::debug;

use crate::collapse::{Collapse, find_collapse};
use crate::{ConfigurationError, Exponent, Searcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Absolute position of the term in the series.
    pub index: BigUint,
    /// `10^precision * |ln 2 - average of the last two cumulative sums|`.
    pub deviation: Decimal,
}

/// The trailing window of the series just below `10^(exponent + 1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    samples: Vec<Sample>,
}

impl Sequence {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn deviations(&self) -> impl Iterator<Item = &Decimal> {
        self.samples.iter().map(|sample| &sample.deviation)
    }

    pub fn find_collapse(&self) -> Option<Collapse> {
        find_collapse(&self.deviations().collect::<Vec<_>>())
    }
}

impl Searcher {
    /// `floor(10^(exponent + 1))`, with the power rounded to the working precision.
    pub fn threshold(&self, exponent: &Exponent) -> BigUint {
        self.precision
            .pow10(&(exponent.to_decimal() + Decimal::one()))
            .floor()
            .to_biguint()
            .unwrap_or_default()
    }

    /// Materializes the last `offset` terms before [`threshold`](Self::threshold).
    ///
    /// Each term is `base / x`, negated when `x` is odd. The sign follows the absolute index of the
    /// term, not its position in the window. The cumulative sum restarts at zero for every call.
    pub fn generate(
        &self,
        exponent: &Exponent,
        offset: u64,
        base: &Decimal,
    ) -> Result<Sequence, ConfigurationError> {
        if offset == 0 {
            return Err(ConfigurationError::ZeroOffset);
        }
        let threshold = self.threshold(exponent);
        if BigUint::from(offset) >= threshold {
            return Err(ConfigurationError::OffsetTooLarge {
                offset,
                exponent: exponent.clone(),
                threshold,
            });
        }

        let p = self.precision;
        let ln2 = self.constants.ln2(p);
        let scale = Decimal::pow10(i64::from(p.digits()));
        let two = Decimal::from(2u32);

        let mut samples = Vec::with_capacity(offset as usize);
        let mut cumulative = Decimal::zero();
        let mut previous = None::<Decimal>;
        let mut index = &threshold - offset;
        while index < threshold {
            let term = p
                .div(base, &Decimal::from(index.clone()))
                .expect("window starts above zero");
            let term = if (&index % 2u32).is_zero() {
                term
            } else {
                -term
            };
            cumulative = p.add(&cumulative, &term);

            let average = match &previous {
                Some(previous) => p
                    .div(&p.add(previous, &cumulative), &two)
                    .expect("two is non-zero"),
                None => cumulative.clone(),
            };
            let deviation = p.mul(&p.sub(&ln2, &average).abs(), &scale);

            samples.push(Sample {
                index: index.clone(),
                deviation,
            });
            previous = Some(cumulative.clone());
            index += 1u32;
        }

        Ok(Sequence { samples })
    }

    /// Like [`generate`](Self::generate), additionally logging every sample.
    pub fn generate_traced(
        &self,
        exponent: &Exponent,
        offset: u64,
        base: &Decimal,
    ) -> Result<Sequence, ConfigurationError> {
        let sequence = self.generate(exponent, offset, base)?;
        self.trace(&sequence);
        Ok(sequence)
    }

    pub(crate) fn trace(&self, sequence: &Sequence) {
        for sample in sequence.samples() {
            debug!(self.log, "{}: {}", sample.index, sample.deviation);
        }
    }
}

#[cfg(test)]
mod tests {
    use fixcap_decimal::Decimal;
    use num_bigint::BigUint;

    use crate::{ConfigurationError, Exponent, test_searcher};

    fn indices(start: u64, end: u64) -> Vec<BigUint> {
        (start..end).map(BigUint::from).collect()
    }

    #[test]
    fn test_window_indices() {
        let searcher = test_searcher(15);

        let sequence = searcher
            .generate(&Exponent::integer(2), 10, &Decimal::one())
            .unwrap();
        assert_eq!(sequence.len(), 10);
        assert_eq!(
            sequence.samples().iter().map(|s| s.index.clone()).collect::<Vec<_>>(),
            indices(990, 1000)
        );

        // 10^1.5 = 31.6...
        let sequence = searcher
            .generate(&Exponent::new(5, 1), 4, &Decimal::one())
            .unwrap();
        assert_eq!(
            sequence.samples().iter().map(|s| s.index.clone()).collect::<Vec<_>>(),
            indices(27, 31)
        );
    }

    #[test]
    fn test_threshold() {
        let searcher = test_searcher(28);
        assert_eq!(searcher.threshold(&Exponent::integer(2)), BigUint::from(1000u32));
        assert_eq!(
            searcher.threshold(&Exponent::new(835, 2)),
            BigUint::from(2238721138u64)
        );
        assert_eq!(
            searcher.threshold(&Exponent::integer(38)),
            BigUint::from(10u32).pow(39)
        );
        assert_eq!(searcher.threshold(&Exponent::integer(-3)), BigUint::default());
    }

    #[test]
    fn test_deterministic() {
        let searcher = test_searcher(15);
        let exponent = Exponent::new(425, 2);
        let first = searcher.generate(&exponent, 10, &Decimal::one()).unwrap();
        let second = searcher.generate(&exponent, 10, &Decimal::one()).unwrap();
        assert_eq!(first, second);

        let other = test_searcher(15);
        assert_eq!(first, other.generate(&exponent, 10, &Decimal::one()).unwrap());
    }

    #[test]
    fn test_traced_matches_untraced() {
        let searcher = test_searcher(12);
        let exponent = Exponent::integer(3);
        assert_eq!(
            searcher.generate(&exponent, 6, &Decimal::one()).unwrap(),
            searcher.generate_traced(&exponent, 6, &Decimal::one()).unwrap()
        );
    }

    #[test]
    fn test_sign_follows_absolute_parity() {
        let searcher = test_searcher(15);
        let p = searcher.precision();
        let ln2 = searcher.constants().ln2(p);
        let scale = Decimal::pow10(15);

        // window starting at the odd index 999 with a single term: -1/999
        let sequence = searcher
            .generate(&Exponent::integer(2), 1, &Decimal::one())
            .unwrap();
        let term = p.div(&Decimal::one(), &Decimal::from(999u32)).unwrap();
        assert_eq!(
            sequence.samples()[0].deviation,
            p.mul(&p.add(&ln2, &term), &scale)
        );

        // window starting at the even index 998: +1/998
        let sequence = searcher
            .generate(&Exponent::integer(2), 2, &Decimal::one())
            .unwrap();
        let term = p.div(&Decimal::one(), &Decimal::from(998u32)).unwrap();
        assert_eq!(
            sequence.samples()[0].deviation,
            p.mul(&p.sub(&ln2, &term), &scale)
        );
    }

    #[test]
    fn test_average_of_last_two_sums() {
        let searcher = test_searcher(15);
        let p = searcher.precision();
        let ln2 = searcher.constants().ln2(p);

        let sequence = searcher
            .generate(&Exponent::integer(2), 2, &Decimal::one())
            .unwrap();
        let first = p.div(&Decimal::one(), &Decimal::from(998u32)).unwrap();
        let second = p.add(
            &first,
            &-p.div(&Decimal::one(), &Decimal::from(999u32)).unwrap(),
        );
        let average = p
            .div(&p.add(&first, &second), &Decimal::from(2u32))
            .unwrap();
        assert_eq!(
            sequence.samples()[1].deviation,
            p.mul(&p.sub(&ln2, &average).abs(), &Decimal::pow10(15))
        );
    }

    #[test]
    fn test_base_scales_terms() {
        let searcher = test_searcher(15);
        let p = searcher.precision();
        let ln2 = searcher.constants().ln2(p);

        let sequence = searcher
            .generate(&Exponent::integer(2), 2, &Decimal::from(3u32))
            .unwrap();
        let term = p.div(&Decimal::from(3u32), &Decimal::from(998u32)).unwrap();
        assert_eq!(
            sequence.samples()[0].deviation,
            p.mul(&p.sub(&ln2, &term), &Decimal::pow10(15))
        );
    }

    #[test]
    fn test_offset_must_fit_below_threshold() {
        let searcher = test_searcher(15);
        assert!(matches!(
            searcher.generate(&Exponent::integer(0), 10, &Decimal::one()),
            Err(ConfigurationError::OffsetTooLarge { offset: 10, .. })
        ));
        assert_eq!(
            searcher
                .generate(&Exponent::integer(0), 9, &Decimal::one())
                .unwrap()
                .samples()[0]
                .index,
            BigUint::from(1u32)
        );
        assert!(matches!(
            searcher.generate(&Exponent::integer(2), 0, &Decimal::one()),
            Err(ConfigurationError::ZeroOffset)
        ));
    }
}
