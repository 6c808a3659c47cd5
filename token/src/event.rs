//! Events appended to the ledger journal on every successful mutation.

use blackhole_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Balance movement. Mints come from and burns go to [`Address::ZERO`].
    Transfer {
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
    /// New allowance value after approve, an adjustment or a permit.
    /// Allowance spent by `transfer_from` is not reported.
    Approval {
        owner: Address,
        spender: Address,
        amount: TokenAmount,
    },
    OwnershipTransferred { previous: Address, new: Address },
}
