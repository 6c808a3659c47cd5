//! Single-owner access control.

use blackhole_types::Address;
use tracing::info;

use crate::error::TokenError;
use crate::event::TokenEvent;

/// The owner slot gating privileged ledger operations.
///
/// There is exactly one owner at a time and no pending-owner handshake: a
/// transfer takes effect immediately. Callers re-check through
/// [`Ownable::ensure_owner`] on every privileged call, never caching the
/// result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fails for every caller once ownership has been renounced.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), TokenError> {
        if self.owner.is_zero() || *caller != self.owner {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hand the owner slot to `new_owner`. The null address is refused; use
    /// [`Ownable::renounce_ownership`] to give the slot up.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<TokenEvent, TokenError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(TokenError::InvalidOwner { owner: new_owner });
        }
        Ok(self.replace_owner(new_owner))
    }

    /// Give up ownership for good. Owner-gated operations are disabled from
    /// then on, whoever the caller claims to be.
    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<TokenEvent, TokenError> {
        self.ensure_owner(caller)?;
        Ok(self.replace_owner(Address::ZERO))
    }

    fn replace_owner(&mut self, new_owner: Address) -> TokenEvent {
        let previous = std::mem::replace(&mut self.owner, new_owner);
        info!(%previous, new = %new_owner, "ownership transferred");
        TokenEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        }
    }
}
