//! Product domain types
//!
//! The `Product` entity and the inputs the service accepts for creating and
//! updating it.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// == Price ==
/// Currency amount with two-digit precision, held as whole cents.
///
/// Serialized as a JSON number (`9.99`). Deserialization rounds to the
/// nearest cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

/// 2^53, the largest cent count an `f64` holds without rounding.
const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

impl Price {
    /// Creates a price from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Rounds a decimal amount to the nearest cent.
    ///
    /// Returns None for NaN, infinities, and amounts whose cent count is not
    /// exactly representable as an `f64` integer.
    pub fn from_f64(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        if cents.is_finite() && cents.abs() <= MAX_EXACT_CENTS {
            Some(Self(cents as i64))
        } else {
            None
        }
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_f64(amount).ok_or_else(|| de::Error::custom("price is out of range"))
    }
}

// == Product ==
/// A catalog product as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-generated identifier, immutable
    pub id: Uuid,
    pub name: String,
    pub price: Price,
    /// Server-generated creation time, immutable
    pub created_at: DateTime<Utc>,
    /// Absent while the schema predates the Description column
    pub description: Option<String>,
}

/// Caller-supplied fields of a product about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
}
