//! An exact monetary amount.
//!
//! Amounts are stored as whole cents so that aggregation over arbitrarily
//! many transactions never loses precision. Conversion to decimal dollars
//! happens only at the JSON boundary and when formatting for display.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};

/// A monetary amount in whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from decimal dollars, rounding to the nearest cent.
    pub fn from_dollars(dollars: f64) -> Self {
        Self((dollars * 100.0).round() as i64)
    }

    /// The amount in whole cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in dollars, for the JSON boundary.
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is greater than zero.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The larger of this amount and zero.
    pub fn clamp_non_negative(&self) -> Self {
        Self(self.0.max(0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::add)
    }
}

impl Display for Money {
    /// Formats the amount as decimal dollars with exactly two decimal places,
    /// e.g. `-12.30`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}

/// Serializes [Money] as decimal dollars in JSON, e.g. `45.99`, and parses
/// decimal dollars back to whole cents.
///
/// For use with `#[serde(with = "crate::money::serde_dollars")]`.
pub mod serde_dollars {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    /// Serialize an amount as decimal dollars.
    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_dollars())
    }

    /// Deserialize decimal dollars, rounding to the nearest cent.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        f64::deserialize(deserializer).map(Money::from_dollars)
    }
}
