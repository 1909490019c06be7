use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use fixcap_decimal::{Decimal, Precision};

/// Digits carried beyond the working precision, so that subtracting from the constant rounds
/// only once.
const GUARD_DIGITS: u32 = 10;

/// Lazily evaluated ln 2, one value per working precision.
#[derive(Debug, Default)]
pub struct Constants {
    ln2: Mutex<HashMap<Precision, Arc<Decimal>>>,
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    /// ln 2 to `precision` plus guard digits.
    pub fn ln2(&self, precision: Precision) -> Arc<Decimal> {
        let mut cache = self.ln2.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(precision)
            .or_insert_with(|| Arc::new(precision.with_guard(GUARD_DIGITS).ln2()))
            .clone()
    }
}
