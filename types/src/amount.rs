//! Amount types for the ledger token and the native value unit.
//!
//! Both are fixed-width unsigned integers (u128) in raw units. The ledger
//! never wraps: all arithmetic goes through the checked helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimals used by both the token and the native unit.
pub const DECIMALS: u8 = 18;

/// Raw units in one whole token or one whole native coin (10^18).
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Ledger token amount.
///
/// `TokenAmount::MAX` is both the supply cap and the infinite-allowance
/// sentinel: an allowance equal to it is never decremented.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whether this amount is the infinite-allowance sentinel.
    pub fn is_max(&self) -> bool {
        self.0 == u128::MAX
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl From<NativeAmount> for TokenAmount {
    /// Native value converts 1:1 into ledger credit.
    fn from(value: NativeAmount) -> Self {
        Self(value.raw())
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount of the host environment's native value unit (the thing a sink destroys).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NativeAmount(u128);

impl NativeAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Build an amount from whole coins, e.g. `from_whole(1)` is 10^18 raw.
    pub fn from_whole(coins: u64) -> Option<Self> {
        (coins as u128).checked_mul(UNIT).map(Self)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl From<u128> for NativeAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let frac = format!("{:018}", frac);
            write!(f, "{}.{}", whole, frac.trim_end_matches('0'))
        }
    }
}
