use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

/// Amounts beyond this many cents cannot be represented exactly by an `f64` wire value.
const MAX_WIRE_CENTS: f64 = 9_007_199_254_740_991.0;

//--------------------------------------        Price         ---------------------------------------------------------
/// A monetary amount, held and stored as a whole number of cents.
///
/// On the wire, prices are plain numbers in currency units (`25`, `12.5`), so `Price` converts at the serde boundary.
/// Fractions of a cent are rounded to the nearest cent.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Price(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a price: {0}")]
pub struct PriceConversionError(String);

impl From<i64> for Price {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceConversionError;

    /// Converts an amount in currency units to a price.
    fn try_from(units: f64) -> Result<Self, Self::Error> {
        let cents = (units * 100.0).round();
        if !cents.is_finite() || cents.abs() > MAX_WIRE_CENTS {
            return Err(PriceConversionError(format!("{units} is not a valid amount")));
        }
        Ok(Self(cents as i64))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_units())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(deserializer)?;
        Price::try_from(units).map_err(serde::de::Error::custom)
    }
}

impl Price {
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The amount in currency units, as it appears on the wire.
    pub fn to_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}
