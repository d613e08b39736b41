//! Exact decimal amounts
//!
//! Exchanges publish quantities and prices as decimal strings. `Amount` keeps
//! them as `rust_decimal::Decimal` end to end so that summing thousands of small
//! trades never accumulates binary floating-point error.

use rust_decimal::{Decimal, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Arbitrary-precision decimal used for every quantity and value in the ledger.
///
/// Serialized as a JSON string (`"0.01"`), never as a float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Zero value
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// One value
    pub const ONE: Amount = Amount {
        value: Decimal::ONE,
    };

    /// Parse an exchange decimal string such as `"0.00100000"`.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self::from)
            .map_err(|_| AmountError::Invalid(s.to_string()))
    }

    /// Create an Amount from a float published by a price feed.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        Decimal::from_f64(value)
            .map(Self::from)
            .ok_or_else(|| AmountError::Invalid(value.to_string()))
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Drop trailing zeros (`"1.500"` -> `"1.5"`)
    pub fn normalize(&self) -> Self {
        Self::from(self.value.normalize())
    }

    /// `self * other`, or `None` when the product does not fit.
    pub fn checked_mul(&self, other: Amount) -> Option<Amount> {
        self.value.checked_mul(other.value).map(Self::from)
    }

    /// `self / other * 100`, or `None` when `other` is zero.
    pub fn percent_of(&self, other: Amount) -> Option<Amount> {
        if other.is_zero() {
            return None;
        }
        self.value
            .checked_div(other.value)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(Self::from)
    }
}

/// Decimal parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("empty decimal string")]
    Empty,
    #[error("invalid decimal value: {0:?}")]
    Invalid(String),
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from(self.value + rhs.value)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from(self.value - rhs.value)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Self::from(-self.value)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount { value }
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value
    }
}

/// Convenience macro for literal amounts in tests and constants
#[macro_export]
macro_rules! amount {
    ($value:expr) => {
        $crate::amount::Amount::parse(stringify!($value)).unwrap()
    };
}
