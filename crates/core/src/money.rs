//! Currency-agnostic money amounts.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Minor units per major unit (two decimal places).
const MINOR_PER_MAJOR: u64 = 100;

/// Non-negative amount in the smallest currency unit (e.g. cents).
///
/// The currency itself is the caller's concern; amounts from different
/// currencies must never be mixed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub fn minor(&self) -> u64 {
        self.0
    }

    /// Convert a decimal major-unit amount (as found in JSON payloads) into
    /// minor units, rounding half up at two decimals.
    pub fn from_major(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        scaled_to_minor((amount * MINOR_PER_MAJOR as f64).round()).map(Self)
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money overflow on add"))
    }

    /// Line total: unit price times quantity.
    pub fn checked_mul(self, quantity: u32) -> DomainResult<Money> {
        self.0
            .checked_mul(u64::from(quantity))
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money overflow on multiply"))
    }

    /// Signed difference `to - from` in minor units.
    pub fn delta(from: Money, to: Money) -> i128 {
        i128::from(to.0) - i128::from(from.0)
    }
}

/// `u64::MAX as f64` rounds up to 2^64, which is itself out of range.
fn scaled_to_minor(minor: f64) -> DomainResult<u64> {
    if minor >= u64::MAX as f64 {
        return Err(DomainError::validation("price is out of range"));
    }
    Ok(minor as u64)
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_PER_MAJOR, self.0 % MINOR_PER_MAJOR)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parse a plain decimal string such as `"12"`, `"12.5"` or `"12.00"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, ""),
        };

        let valid_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if major.is_empty() || !valid_digits(major) || !valid_digits(minor) || minor.len() > 2 {
            return Err(DomainError::validation(format!("invalid money amount: {s:?}")));
        }

        let out_of_range = || DomainError::validation(format!("money amount out of range: {s:?}"));
        let major: u64 = major.parse().map_err(|_| out_of_range())?;
        let minor: u64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<u64>().map_err(|_| out_of_range())? * 10,
            _ => minor.parse::<u64>().map_err(|_| out_of_range())?,
        };

        major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .map(Money)
            .ok_or_else(out_of_range)
    }
}

impl ValueObject for Money {}
