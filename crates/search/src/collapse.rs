use std::fmt::{self, Formatter};

use crate::Sequence;

/// Which derived difference array held the zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Differences {
    /// Neighbouring values.
    Consecutive,
    /// Values at positions 0, 2, 4, ...
    Even,
    /// Values at positions 1, 3, 5, ...
    Odd,
}

impl Differences {
    fn stride(self) -> usize {
        match self {
            Self::Consecutive => 1,
            Self::Even | Self::Odd => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapse {
    pub differences: Differences,
    /// Position of the first of the two equal values within the sequence.
    pub position: usize,
}

impl fmt::Display for Collapse {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} difference between positions {} and {} is zero",
            self.differences,
            self.position,
            self.position + self.differences.stride()
        )
    }
}

/// Finds the first zero among the consecutive, even-position and odd-position first differences
/// of `values`, checked in that order.
///
/// A difference is zero only when the two values are exactly equal.
pub fn find_collapse<T: PartialEq>(values: &[T]) -> Option<Collapse> {
    let first_equal = |differences: Differences| {
        let start = match differences {
            Differences::Consecutive | Differences::Even => 0,
            Differences::Odd => 1,
        };
        let stride = differences.stride();
        let lhs = values.iter().skip(start).step_by(stride);
        let rhs = values.iter().skip(start + stride).step_by(stride);
        lhs.zip(rhs)
            .position(|(lhs, rhs)| lhs == rhs)
            .map(|i| Collapse {
                differences,
                position: start + i * stride,
            })
    };
    first_equal(Differences::Consecutive)
        .or_else(|| first_equal(Differences::Even))
        .or_else(|| first_equal(Differences::Odd))
}

pub fn collapsed(sequence: &Sequence) -> bool {
    sequence.find_collapse().is_some()
}
