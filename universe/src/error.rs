//! Host and factory errors.

use blackhole_token::TokenError;
use blackhole_types::{Address, NativeAmount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniverseError {
    #[error("insufficient native value in {account}: need {needed}, have {available}")]
    InsufficientValue {
        account: Address,
        needed: NativeAmount,
        available: NativeAmount,
    },

    #[error("native supply overflow: {circulating} + {amount} exceeds the maximum amount")]
    NativeOverflow {
        circulating: NativeAmount,
        amount: NativeAmount,
    },

    #[error("sink {0} has already been funded")]
    SinkConsumed(Address),

    #[error("a sink was already deployed at {0}")]
    SinkExists(Address),

    #[error("no sink at {0}")]
    UnknownSink(Address),

    #[error("no component deployed at {0}")]
    UnknownContract(Address),

    #[error("factory credits ledger {expected}, called with {actual}")]
    LedgerMismatch { expected: Address, actual: Address },

    #[error(transparent)]
    Token(#[from] TokenError),
}
