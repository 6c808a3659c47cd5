//! Balances of the native value unit.

use std::collections::HashMap;

use blackhole_types::{Address, NativeAmount};
use tracing::debug;

use crate::error::UniverseError;

/// Per-account native balances.
///
/// Invariant: the sum of all balances equals `circulating`. Value leaves
/// circulation only through [`NativeBank::destroy`], which adds it to
/// `destroyed`; nothing ever takes it back out.
#[derive(Debug, Default)]
pub struct NativeBank {
    balances: HashMap<Address, NativeAmount>,
    circulating: NativeAmount,
    destroyed: NativeAmount,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> NativeAmount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn circulating(&self) -> NativeAmount {
        self.circulating
    }

    /// Total value removed from circulation by sinks.
    pub fn destroyed(&self) -> NativeAmount {
        self.destroyed
    }

    /// Issue new value to `account`.
    pub fn credit(&mut self, account: &Address, amount: NativeAmount) -> Result<(), UniverseError> {
        let circulating = self
            .circulating
            .checked_add(amount)
            .ok_or(UniverseError::NativeOverflow {
                circulating: self.circulating,
                amount,
            })?;
        self.circulating = circulating;
        self.add(account, amount);
        debug!(%account, %amount, "native credit");
        Ok(())
    }

    /// Balance of `account` after removing `amount`, or the shortfall error.
    pub fn check_debit(
        &self,
        account: &Address,
        amount: NativeAmount,
    ) -> Result<NativeAmount, UniverseError> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(UniverseError::InsufficientValue {
                account: *account,
                needed: amount,
                available,
            })
    }

    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: NativeAmount,
    ) -> Result<(), UniverseError> {
        let remaining = self.check_debit(from, amount)?;
        self.set(*from, remaining);
        self.add(to, amount);
        debug!(%from, %to, %amount, "native transfer");
        Ok(())
    }

    /// Remove exactly `amount` of `account`'s balance from existence.
    pub fn destroy(&mut self, account: &Address, amount: NativeAmount) -> Result<(), UniverseError> {
        let remaining = self.check_debit(account, amount)?;
        self.set(*account, remaining);
        // The removed amount was part of circulating, and destroyed can
        // never exceed everything ever credited.
        self.circulating = NativeAmount::new(self.circulating.raw() - amount.raw());
        self.destroyed = NativeAmount::new(self.destroyed.raw() + amount.raw());
        debug!(%account, %amount, "native value destroyed");
        Ok(())
    }

    fn add(&mut self, account: &Address, amount: NativeAmount) {
        let balance = self.balance_of(account);
        // Bounded by circulating.
        self.set(*account, NativeAmount::new(balance.raw() + amount.raw()));
    }

    fn set(&mut self, account: Address, amount: NativeAmount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }
}
