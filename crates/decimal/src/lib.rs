//! Exact decimal numbers with explicit, per-operation rounding.
//!
//! A [`Decimal`] never rounds by itself: `+`, `-` and `*` are exact. Rounding only happens
//! through a [`Precision`], which rounds half-even to a fixed number of significant digits,
//! the way a decimal arithmetic context does.

mod decimal;
mod precision;
mod transcendental;

pub use decimal::{Decimal, MAX_EXPONENT, ParseDecimalError};
pub use precision::{DivisionByZero, Precision};
