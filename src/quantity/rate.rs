use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Price per kilowatt-hour, in the currency of whatever source produced the rate.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::From,
    derive_more::FromStr,
)]
#[from(f64, OrderedFloat<f64>)]
#[serde(transparent)]
#[must_use]
pub struct KilowattHourRate(pub OrderedFloat<f64>);

impl From<KilowattHourRate> for f64 {
    fn from(rate: KilowattHourRate) -> Self {
        rate.0.0
    }
}

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}/kWh", self.0.0)
    }
}
