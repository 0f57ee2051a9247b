//! Money amounts
//!
//! Prices are held in minor units (centimes) so totals are exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Minor units per major unit
pub const MINOR_PER_UNIT: i64 = 100;

/// A monetary amount in minor units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Money = Money(0);

    /// Create from minor units (centimes)
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Create from whole major units
    pub const fn from_units(units: i64) -> Self {
        Money(units * MINOR_PER_UNIT)
    }

    /// Amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Whole major units, truncated
    pub const fn units(&self) -> i64 {
        self.0 / MINOR_PER_UNIT
    }

    /// Render with a trailing currency symbol, e.g. `150.00DA`
    pub fn display_with(&self, symbol: &str) -> String {
        format!("{self}{symbol}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_UNIT.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / per, abs % per)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}
