pub mod keys;

use std::collections::BTreeMap;

use crate::quantity::rate::KilowattHourRate;

/// Minute offset from a caller-defined origin, usually the start of the day.
pub type Minute = u32;

/// Per-minute rates, keyed by the minute offset of the slot start.
pub type RateTable = BTreeMap<Minute, KilowattHourRate>;

/// Import and export tables for the same period.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rates {
    pub import: RateTable,

    pub export: RateTable,
}

impl Rates {
    pub const fn new(import: RateTable, export: RateTable) -> Self {
        Self { import, export }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.import.is_empty() && self.export.is_empty()
    }
}

#[cfg(test)]
pub fn rate_table<const N: usize>(entries: [(Minute, f64); N]) -> RateTable {
    entries.into_iter().map(|(minute, rate)| (minute, rate.into())).collect()
}
