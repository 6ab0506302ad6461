//! Monetary deal value held in integer minor units.

use super::{PipelineDomainError, PipelineDomainResult, Probability};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Non-negative monetary value of a deal, stored as whole cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DealValue(u64);

impl DealValue {
    /// Zero value.
    pub const ZERO: Self = Self(0);

    const CENTS_PER_UNIT: u64 = 100;

    /// Creates a value from cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a value from whole currency units.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidDealValue`] on overflow.
    pub fn from_units(units: u64) -> PipelineDomainResult<Self> {
        units
            .checked_mul(Self::CENTS_PER_UNIT)
            .map(Self)
            .ok_or_else(|| PipelineDomainError::InvalidDealValue(units.to_string()))
    }

    /// Parses a decimal amount such as `"75000"` or `"1250.5"`.
    ///
    /// At most two fractional digits are accepted. Signs, exponents and
    /// thousands separators are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidDealValue`] when the input is not
    /// a non-negative decimal amount.
    pub fn parse(raw: &str) -> PipelineDomainResult<Self> {
        let invalid = || PipelineDomainError::InvalidDealValue(raw.to_owned());
        let trimmed = raw.trim();
        let (units_part, cents_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if units_part.is_empty() || !all_digits(units_part) || !all_digits(cents_part) {
            return Err(invalid());
        }
        if cents_part.len() > 2 {
            return Err(invalid());
        }

        let units: u64 = units_part.parse().map_err(|_| invalid())?;
        let cents: u64 = match cents_part.len() {
            0 => 0,
            1 => cents_part.parse::<u64>().map_err(|_| invalid())?.saturating_mul(10),
            _ => cents_part.parse().map_err(|_| invalid())?,
        };

        units
            .checked_mul(Self::CENTS_PER_UNIT)
            .and_then(|whole| whole.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Returns the value in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Adds two values, saturating at the maximum representable amount.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Returns the value scaled by a close probability, rounded down to the
    /// cent.
    #[must_use]
    pub fn weighted_by(self, probability: Probability) -> Self {
        let scaled = u128::from(self.0)
            .saturating_mul(u128::from(probability.value()))
            .div_euclid(u128::from(Probability::MAX));
        Self(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}

impl Sum for DealValue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for DealValue {
    /// Formats as US dollars with thousands separators, omitting the cents
    /// when they are zero (`$75,000`, `$1,250.50`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0.div_euclid(Self::CENTS_PER_UNIT);
        let cents = self.0.rem_euclid(Self::CENTS_PER_UNIT);

        let digits = units.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len().div_euclid(3));
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index).rem_euclid(3) == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if cents == 0 {
            write!(f, "${grouped}")
        } else {
            write!(f, "${grouped}.{cents:02}")
        }
    }
}
