//! Core domain types for the storefront order views.
//!
//! Orders are owned by the remote backend. This crate only reads them, so
//! `Order` keeps the backend's raw `status` tag and leaves interpretation to
//! the projector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque identifier of a purchase
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a new `TransactionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money amount in cents (to avoid floating point issues)
///
/// The backend sends amounts either as JSON numbers or as decimal strings
/// (`"120.50"`); both deserialize to whole cents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a new money amount from cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new money amount from whole currency units
    #[must_use]
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Converts a decimal amount, rounding to the nearest cent
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` cent range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // range checked above the cast
    pub fn from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents.abs() >= 9.0e18 {
            return None;
        }
        Some(Self(cents as i64))
    }

    /// Returns the value in cents
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value in currency units (as floating point)
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // i64 to f64 precision loss is acceptable for display
    pub fn dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(f64),
            Text(String),
        }

        let amount = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(value) => value,
            RawAmount::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                serde::de::Error::custom(format!("invalid decimal amount: {text:?}"))
            })?,
        };

        Self::from_decimal(amount)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {amount}")))
    }
}

/// A purchase as returned by the backend
///
/// Read-only from the storefront's point of view: nothing in this crate
/// mutates an `Order` after it has been fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Purchase identifier
    pub transaction_id: TransactionId,
    /// Raw lifecycle tag (`no_procesado`, `procesado`, `enviado`, `entregada`)
    pub status: String,
    /// When the order was created
    pub date_issued: DateTime<Utc>,
    /// Order total
    pub amount: Money,
    /// Recipient name
    #[serde(default)]
    pub full_name: String,
    /// First shipping address line
    #[serde(default)]
    pub address_line_1: String,
    /// Second shipping address line
    #[serde(default)]
    pub address_line_2: String,
}
