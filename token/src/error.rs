//! Ledger errors.

use blackhole_types::{Address, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance for spender {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        spender: Address,
        needed: u128,
        available: u128,
    },

    #[error("allowance overflow: {current} + {delta} exceeds the maximum amount")]
    AllowanceOverflow { current: u128, delta: u128 },

    #[error("supply overflow: {supply} + {amount} exceeds the maximum amount")]
    SupplyOverflow { supply: u128, amount: u128 },

    #[error("account {caller} is not the owner")]
    Unauthorized { caller: Address },

    #[error("{owner} cannot hold ownership")]
    InvalidOwner { owner: Address },

    #[error("permit expired: deadline {deadline}, now {now}")]
    ExpiredPermit { deadline: Timestamp, now: Timestamp },

    #[error("permit signature does not recover to owner {owner}")]
    InvalidSigner {
        owner: Address,
        recovered: Option<Address>,
    },
}
