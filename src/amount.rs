use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use crate::errors::{FineError, Result};

/// Non-negative money amount with a major unit and a minor unit in `0..=99`.
///
/// Every constructor and operator returns a normalized value: the minor unit
/// never leaves its range and the amount never drops below zero. Ordering
/// compares the major unit first, then the minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    major: u64,
    minor: u8,
}

impl Amount {
    pub const ZERO: Amount = Amount { major: 0, minor: 0 };
    pub const MAX: Amount = Amount {
        major: u64::MAX,
        minor: 99,
    };

    /// create from major and minor units, carrying or borrowing between them
    ///
    /// Fails with `InvalidAmount` when `major` is negative or when a negative
    /// minor unit would borrow the amount below zero.
    pub fn new(major: i64, minor: i64) -> Result<Self> {
        if major < 0 {
            return Err(FineError::invalid_amount(format!("{major} (minor {minor})")));
        }
        let cents = i128::from(major) * 100 + i128::from(minor);
        if cents < 0 {
            return Err(FineError::invalid_amount(format!("{major} (minor {minor})")));
        }
        Ok(Self::from_cents(cents as u128))
    }

    /// create from whole major units
    pub fn from_major(major: u64) -> Self {
        Amount { major, minor: 0 }
    }

    /// create from a real number, discarding its sign
    ///
    /// The major unit is the truncated value; the minor unit is the rounded
    /// cent count minus the major part, clamped to `0..=99`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Amount::ZERO;
        }
        match Decimal::from_f64(value.abs()) {
            Some(d) => Self::from_decimal(d),
            None => Amount::MAX,
        }
    }

    /// create from an exact decimal with the same rule as `from_f64`
    pub fn from_decimal(value: Decimal) -> Self {
        let value = value.abs();
        let major = value.trunc();
        let Some(cents) = value.checked_mul(dec!(100)) else {
            return Amount::MAX;
        };
        let minor = cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            - major * dec!(100);
        let minor = minor.clamp(Decimal::ZERO, dec!(99));

        Amount {
            major: major.to_u64().unwrap_or(u64::MAX),
            minor: minor.to_u8().unwrap_or(0),
        }
    }

    /// create from a decimal, truncating toward zero to whole cents
    fn from_decimal_truncated(value: Decimal) -> Self {
        let value = value
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::ToZero);
        let major = value.trunc();
        let minor = (value - major) * dec!(100);

        Amount {
            major: major.to_u64().unwrap_or(u64::MAX),
            minor: minor.to_u8().unwrap_or(0),
        }
    }

    fn from_cents(cents: u128) -> Self {
        match u64::try_from(cents / 100) {
            Ok(major) => Amount {
                major,
                minor: (cents % 100) as u8,
            },
            Err(_) => Amount::MAX,
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    pub fn is_zero(&self) -> bool {
        self.major == 0 && self.minor == 0
    }

    /// exact decimal value (major + minor / 100)
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.major) + Decimal::new(i64::from(self.minor), 2)
    }

    /// real value for display and the wire format
    pub fn to_f64(&self) -> f64 {
        self.as_decimal()
            .to_f64()
            .unwrap_or(self.major as f64 + f64::from(self.minor) / 100.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        let minor = u16::from(self.minor) + u16::from(other.minor);
        Amount {
            major: self
                .major
                .saturating_add(other.major)
                .saturating_add(u64::from(minor / 100)),
            minor: (minor % 100) as u8,
        }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        *self = *self + other;
    }
}

impl Sub for Amount {
    type Output = Amount;

    /// clamps to zero instead of going negative
    fn sub(self, other: Amount) -> Amount {
        let (minor, borrow) = if self.minor >= other.minor {
            (self.minor - other.minor, 0)
        } else {
            (self.minor + 100 - other.minor, 1)
        };

        match self
            .major
            .checked_sub(other.major)
            .and_then(|major| major.checked_sub(borrow))
        {
            Some(major) => Amount { major, minor },
            None => Amount::ZERO,
        }
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Amount) {
        *self = *self - other;
    }
}

impl Mul<i64> for Amount {
    type Output = Amount;

    fn mul(self, factor: i64) -> Amount {
        let factor = u128::from(factor.unsigned_abs());
        let minor = u128::from(self.minor) * factor;
        let major = u128::from(self.major) * factor + minor / 100;
        match u64::try_from(major) {
            Ok(major) => Amount {
                major,
                minor: (minor % 100) as u8,
            },
            Err(_) => Amount::MAX,
        }
    }
}

impl Mul<u32> for Amount {
    type Output = Amount;

    fn mul(self, factor: u32) -> Amount {
        self * i64::from(factor)
    }
}

impl Mul<Decimal> for Amount {
    type Output = Amount;

    /// exact product truncated toward zero to whole cents
    fn mul(self, factor: Decimal) -> Amount {
        match self.as_decimal().checked_mul(factor.abs()) {
            Some(product) => Amount::from_decimal_truncated(product),
            None => Amount::MAX,
        }
    }
}

impl Mul<f64> for Amount {
    type Output = Amount;

    fn mul(self, factor: f64) -> Amount {
        if factor.is_nan() {
            return Amount::ZERO;
        }
        match Decimal::from_f64(factor.abs()) {
            Some(factor) => self * factor,
            None if self.is_zero() => Amount::ZERO,
            None => Amount::MAX,
        }
    }
}

impl MulAssign<i64> for Amount {
    fn mul_assign(&mut self, factor: i64) {
        *self = *self * factor;
    }
}

impl MulAssign<Decimal> for Amount {
    fn mul_assign(&mut self, factor: Decimal) {
        *self = *self * factor;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        if raw < 0.0 {
            return Err(serde::de::Error::custom(FineError::invalid_amount(raw)));
        }
        Ok(Amount::from_f64(raw))
    }
}

/// interest rate as a fraction per period (0.01 is 1 %)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn from_f64(f: f64) -> Option<Self> {
        Decimal::from_f64(f).map(Rate)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}
