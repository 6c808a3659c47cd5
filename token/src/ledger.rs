//! Balance, allowance and supply bookkeeping.

use std::collections::HashMap;

use blackhole_types::{Address, ChainId, Hash256, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::access::Ownable;
use crate::error::TokenError;
use crate::event::TokenEvent;
use crate::permit::{Ed25519Recovery, Permit, PermitDomain, SignerRecovery};

/// Static token metadata. `name` and `version` are also part of the permit domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_decimals() -> u8 {
    blackhole_types::amount::DECIMALS
}

fn default_version() -> String {
    "1".to_string()
}

impl TokenInfo {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: default_decimals(),
            version: default_version(),
        }
    }
}

/// Allowance change computed by the check phase of a spend.
enum AllowanceSpend {
    /// Infinite allowance; nothing to write.
    Unlimited,
    Remaining(TokenAmount),
}

/// The token ledger.
///
/// Invariant: the sum of all balances equals `total_supply`, which never
/// exceeds `TokenAmount::MAX`. Because of that, crediting an account after a
/// successful supply check or debit can never overflow.
pub struct Ledger {
    address: Address,
    info: TokenInfo,
    domain: PermitDomain,
    domain_separator: Hash256,
    access: Ownable,
    balances: HashMap<Address, TokenAmount>,
    allowances: HashMap<(Address, Address), TokenAmount>,
    nonces: HashMap<Address, u64>,
    total_supply: TokenAmount,
    recovery: Box<dyn SignerRecovery>,
    events: Vec<TokenEvent>,
}

impl Ledger {
    /// Create an empty ledger at `address` owned by `owner`, verifying permits with Ed25519.
    pub fn new(address: Address, info: TokenInfo, chain_id: ChainId, owner: Address) -> Self {
        Self::with_recovery(address, info, chain_id, owner, Box::new(Ed25519Recovery))
    }

    /// Create an empty ledger with a custom signature scheme for permits.
    pub fn with_recovery(
        address: Address,
        info: TokenInfo,
        chain_id: ChainId,
        owner: Address,
        recovery: Box<dyn SignerRecovery>,
    ) -> Self {
        let domain = PermitDomain {
            name: info.name.clone(),
            version: info.version.clone(),
            chain_id,
            verifying_contract: address,
        };
        let domain_separator = domain.separator();
        debug!(%address, name = %info.name, %chain_id, scheme = recovery.scheme(), "ledger created");
        Self {
            address,
            info,
            domain,
            domain_separator,
            access: Ownable::new(owner),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            nonces: HashMap::new(),
            total_supply: TokenAmount::ZERO,
            recovery,
            events: Vec::new(),
        }
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn symbol(&self) -> &str {
        &self.info.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.info.decimals
    }

    pub fn version(&self) -> &str {
        &self.info.version
    }

    pub fn chain_id(&self) -> ChainId {
        self.domain.chain_id
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// The nonce the next permit from `owner` must be signed against.
    pub fn nonces(&self, owner: &Address) -> u64 {
        self.nonces.get(owner).copied().unwrap_or(0)
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn domain(&self) -> &PermitDomain {
        &self.domain
    }

    pub fn domain_separator(&self) -> Hash256 {
        self.domain_separator
    }

    /// The digest `owner` must sign to permit `spender` for `value` at their current nonce.
    pub fn permit_digest(
        &self,
        owner: &Address,
        spender: &Address,
        value: TokenAmount,
        deadline: Timestamp,
    ) -> Hash256 {
        Permit {
            owner: *owner,
            spender: *spender,
            value,
            nonce: self.nonces(owner),
            deadline,
        }
        .digest(&self.domain_separator)
    }

    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Take the journal, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Transfers ───────────────────────────────────────────────────────

    /// Move `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let remaining = self.check_debit(from, amount)?;
        self.set_balance(*from, remaining);
        self.credit(to, amount);
        debug!(%from, %to, %amount, "transfer");
        self.events.push(TokenEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Move `amount` out of `owner`'s balance on behalf of `spender`.
    ///
    /// Both the allowance and the balance are checked before either is
    /// written, so a failing transfer leg never consumes allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let spend = self.check_allowance_spend(owner, spender, amount)?;
        self.check_debit(owner, amount)?;
        self.apply_allowance_spend(owner, spender, spend);
        self.transfer(owner, to, amount)
    }

    // ── Allowances ──────────────────────────────────────────────────────

    /// Overwrite the allowance of `spender` over `owner`'s balance.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: TokenAmount) {
        self.set_allowance(*owner, *spender, amount);
        debug!(%owner, %spender, %amount, "approval");
        self.events.push(TokenEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
    }

    pub fn increase_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        delta: TokenAmount,
    ) -> Result<(), TokenError> {
        let current = self.allowance(owner, spender);
        let updated = current
            .checked_add(delta)
            .ok_or(TokenError::AllowanceOverflow {
                current: current.raw(),
                delta: delta.raw(),
            })?;
        self.approve(owner, spender, updated);
        Ok(())
    }

    pub fn decrease_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        delta: TokenAmount,
    ) -> Result<(), TokenError> {
        let current = self.allowance(owner, spender);
        let updated = current
            .checked_sub(delta)
            .ok_or(TokenError::InsufficientAllowance {
                spender: *spender,
                needed: delta.raw(),
                available: current.raw(),
            })?;
        self.approve(owner, spender, updated);
        Ok(())
    }

    /// Approve through an off-band signature from `owner`.
    ///
    /// The signed message embeds the owner's current nonce, so a consumed or
    /// otherwise stale signature recovers to a different identity and is
    /// rejected as [`TokenError::InvalidSigner`].
    pub fn permit(
        &mut self,
        owner: &Address,
        spender: &Address,
        value: TokenAmount,
        deadline: Timestamp,
        signature: &[u8],
        now: Timestamp,
    ) -> Result<(), TokenError> {
        if deadline.is_past(now) {
            warn!(%owner, %deadline, %now, "permit rejected: expired");
            return Err(TokenError::ExpiredPermit { deadline, now });
        }

        let digest = self.permit_digest(owner, spender, value, deadline);
        let recovered = self.recovery.recover(&digest, signature);
        if recovered != Some(*owner) {
            warn!(%owner, ?recovered, scheme = self.recovery.scheme(), "permit rejected: invalid signer");
            return Err(TokenError::InvalidSigner {
                owner: *owner,
                recovered,
            });
        }

        let nonce = self.nonces.entry(*owner).or_insert(0);
        *nonce += 1;
        debug!(%owner, nonce = *nonce, "permit nonce consumed");
        self.approve(owner, spender, value);
        Ok(())
    }

    // ── Supply ──────────────────────────────────────────────────────────

    /// Create `amount` new tokens for `to`. Owner only.
    ///
    /// Minting to the null account is allowed and behaves like any other
    /// recipient. Minting zero succeeds without touching state.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let new_supply = self.check_mint(caller, amount)?;
        if amount.is_zero() {
            return Ok(());
        }
        self.total_supply = new_supply;
        self.credit(to, amount);
        debug!(%to, %amount, supply = %new_supply, "mint");
        self.events.push(TokenEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Run every check `mint` would run, returning the resulting supply.
    ///
    /// Lets a caller composing several steps validate the mint before it
    /// makes any other change.
    pub fn check_mint(&self, caller: &Address, amount: TokenAmount) -> Result<TokenAmount, TokenError> {
        self.access.ensure_owner(caller)?;
        self.total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow {
                supply: self.total_supply.raw(),
                amount: amount.raw(),
            })
    }

    /// Destroy `amount` of the caller's own tokens. Burning zero is a no-op.
    pub fn burn(&mut self, caller: &Address, amount: TokenAmount) -> Result<(), TokenError> {
        if amount.is_zero() {
            return Ok(());
        }
        let remaining = self.check_debit(caller, amount)?;
        self.set_balance(*caller, remaining);
        self.debit_supply(amount);
        debug!(account = %caller, %amount, supply = %self.total_supply, "burn");
        self.events.push(TokenEvent::Transfer {
            from: *caller,
            to: Address::ZERO,
            amount,
        });
        Ok(())
    }

    /// Burn from `owner`'s balance, spending `spender`'s allowance like `transfer_from`.
    pub fn burn_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let spend = self.check_allowance_spend(owner, spender, amount)?;
        self.check_debit(owner, amount)?;
        self.apply_allowance_spend(owner, spender, spend);
        self.burn(owner, amount)
    }

    // ── Ownership ───────────────────────────────────────────────────────

    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), TokenError> {
        let event = self.access.transfer_ownership(caller, new_owner)?;
        self.events.push(event);
        Ok(())
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), TokenError> {
        let event = self.access.renounce_ownership(caller)?;
        info!(ledger = %self.address, "ownership renounced; minting disabled");
        self.events.push(event);
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Balance of `account` after removing `amount`, or the shortfall error.
    fn check_debit(&self, account: &Address, amount: TokenAmount) -> Result<TokenAmount, TokenError> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: *account,
                needed: amount.raw(),
                available: available.raw(),
            })
    }

    fn check_allowance_spend(
        &self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<AllowanceSpend, TokenError> {
        let current = self.allowance(owner, spender);
        if current.is_max() {
            return Ok(AllowanceSpend::Unlimited);
        }
        current
            .checked_sub(amount)
            .map(AllowanceSpend::Remaining)
            .ok_or(TokenError::InsufficientAllowance {
                spender: *spender,
                needed: amount.raw(),
                available: current.raw(),
            })
    }

    fn apply_allowance_spend(&mut self, owner: &Address, spender: &Address, spend: AllowanceSpend) {
        if let AllowanceSpend::Remaining(remaining) = spend {
            self.set_allowance(*owner, *spender, remaining);
        }
    }

    fn credit(&mut self, account: &Address, amount: TokenAmount) {
        let balance = self.balance_of(account);
        // Bounded by total_supply, so this cannot overflow.
        self.set_balance(*account, TokenAmount::new(balance.raw() + amount.raw()));
    }

    fn debit_supply(&mut self, amount: TokenAmount) {
        // Every burned unit came out of a balance, so supply covers it.
        self.total_supply = TokenAmount::new(self.total_supply.raw() - amount.raw());
    }

    fn set_balance(&mut self, account: Address, amount: TokenAmount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: TokenAmount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackhole_crypto::{derive_address, keypair_from_seed};
    use blackhole_types::KeyPair;

    fn test_address(n: u8) -> Address {
        Address::new([n; 32])
    }

    fn amount(raw: u128) -> TokenAmount {
        TokenAmount::new(raw)
    }

    const OWNER: u8 = 1;
    const ALICE: u8 = 2;
    const BOB: u8 = 3;

    fn test_ledger() -> Ledger {
        Ledger::new(
            test_address(0xEE),
            TokenInfo::new("Blackhole", "BLACK"),
            ChainId::DEV,
            test_address(OWNER),
        )
    }

    /// Ledger with 1000 tokens each for owner, alice and bob.
    fn funded_ledger() -> Ledger {
        let mut ledger = test_ledger();
        for n in [OWNER, ALICE, BOB] {
            ledger
                .mint(&test_address(OWNER), &test_address(n), amount(1000))
                .unwrap();
        }
        ledger.drain_events();
        ledger
    }

    fn signer(seed: u8) -> (KeyPair, Address) {
        let kp = keypair_from_seed(&[seed; 32]);
        let addr = derive_address(&kp.public);
        (kp, addr)
    }

    #[test]
    fn metadata_views() {
        let ledger = test_ledger();
        assert_eq!(ledger.name(), "Blackhole");
        assert_eq!(ledger.symbol(), "BLACK");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.version(), "1");
        assert_eq!(ledger.owner(), test_address(OWNER));
        assert_eq!(ledger.total_supply(), TokenAmount::ZERO);
        assert_eq!(ledger.domain_separator(), ledger.domain().separator());
    }

    #[test]
    fn transfer_moves_balance_and_keeps_supply() {
        let mut ledger = funded_ledger();
        ledger
            .transfer(&test_address(ALICE), &test_address(BOB), amount(300))
            .unwrap();
        assert_eq!(ledger.balance_of(&test_address(ALICE)), amount(700));
        assert_eq!(ledger.balance_of(&test_address(BOB)), amount(1300));
        assert_eq!(ledger.total_supply(), amount(3000));
        assert_eq!(
            ledger.events(),
            &[TokenEvent::Transfer {
                from: test_address(ALICE),
                to: test_address(BOB),
                amount: amount(300),
            }]
        );
    }

    #[test]
    fn transfer_more_than_balance_fails_without_change() {
        let mut ledger = funded_ledger();
        let err = ledger
            .transfer(&test_address(ALICE), &test_address(BOB), amount(1001))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                account: test_address(ALICE),
                needed: 1001,
                available: 1000,
            }
        );
        assert_eq!(ledger.balance_of(&test_address(ALICE)), amount(1000));
        assert_eq!(ledger.balance_of(&test_address(BOB)), amount(1000));
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn self_transfer_keeps_balance() {
        let mut ledger = funded_ledger();
        ledger
            .transfer(&test_address(ALICE), &test_address(ALICE), amount(1000))
            .unwrap();
        assert_eq!(ledger.balance_of(&test_address(ALICE)), amount(1000));
    }

    #[test]
    fn approve_overwrites() {
        let mut ledger = funded_ledger();
        let (o, s) = (test_address(OWNER), test_address(ALICE));
        ledger.approve(&o, &s, amount(1000));
        assert_eq!(ledger.allowance(&o, &s), amount(1000));
        ledger.approve(&o, &s, amount(0));
        assert_eq!(ledger.allowance(&o, &s), amount(0));
        ledger.approve(&o, &s, TokenAmount::MAX);
        assert_eq!(ledger.allowance(&o, &s), TokenAmount::MAX);
    }

    #[test]
    fn increase_allowance_at_max_overflows() {
        let mut ledger = funded_ledger();
        let (o, s) = (test_address(OWNER), test_address(ALICE));
        ledger.approve(&o, &s, TokenAmount::MAX);
        let err = ledger.increase_allowance(&o, &s, amount(1000)).unwrap_err();
        assert_eq!(
            err,
            TokenError::AllowanceOverflow {
                current: u128::MAX,
                delta: 1000,
            }
        );
        assert_eq!(ledger.allowance(&o, &s), TokenAmount::MAX);
    }

    #[test]
    fn increase_then_decrease_allowance() {
        let mut ledger = funded_ledger();
        let (o, s) = (test_address(OWNER), test_address(ALICE));
        ledger.increase_allowance(&o, &s, amount(1000)).unwrap();
        assert_eq!(ledger.allowance(&o, &s), amount(1000));
        ledger.decrease_allowance(&o, &s, amount(1000)).unwrap();
        assert_eq!(ledger.allowance(&o, &s), amount(0));
    }

    #[test]
    fn decrease_allowance_below_zero_fails() {
        let mut ledger = funded_ledger();
        let (o, s) = (test_address(OWNER), test_address(ALICE));
        let err = ledger.decrease_allowance(&o, &s, amount(1000)).unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                spender: s,
                needed: 1000,
                available: 0,
            }
        );
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut ledger = funded_ledger();
        let (o, s, to) = (test_address(OWNER), test_address(ALICE), test_address(BOB));
        ledger.approve(&o, &s, amount(500));
        ledger.transfer_from(&s, &o, &to, amount(200)).unwrap();
        assert_eq!(ledger.allowance(&o, &s), amount(300));
        assert_eq!(ledger.balance_of(&o), amount(800));
        assert_eq!(ledger.balance_of(&to), amount(1200));
    }

    #[test]
    fn transfer_from_beyond_allowance_fails() {
        let mut ledger = funded_ledger();
        let (o, s, to) = (test_address(OWNER), test_address(ALICE), test_address(BOB));
        ledger.approve(&o, &s, amount(100));
        let err = ledger.transfer_from(&s, &o, &to, amount(101)).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
        assert_eq!(ledger.allowance(&o, &s), amount(100));
        assert_eq!(ledger.balance_of(&o), amount(1000));
    }

    #[test]
    fn max_allowance_is_never_decremented() {
        let mut ledger = funded_ledger();
        let (o, s, to) = (test_address(OWNER), test_address(ALICE), test_address(BOB));
        ledger.approve(&o, &s, TokenAmount::MAX);
        ledger.transfer_from(&s, &o, &to, amount(400)).unwrap();
        ledger.transfer_from(&s, &o, &to, amount(600)).unwrap();
        assert_eq!(ledger.allowance(&o, &s), TokenAmount::MAX);
        assert_eq!(ledger.balance_of(&o), amount(0));
    }

    #[test]
    fn failed_transfer_leg_keeps_allowance() {
        let mut ledger = funded_ledger();
        let (o, s, to) = (test_address(OWNER), test_address(ALICE), test_address(BOB));
        ledger.approve(&o, &s, amount(5000));
        let err = ledger.transfer_from(&s, &o, &to, amount(2000)).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(ledger.allowance(&o, &s), amount(5000));
    }

    #[test]
    fn mint_increases_balance_and_supply() {
        let mut ledger = test_ledger();
        ledger
            .mint(&test_address(OWNER), &test_address(OWNER), amount(1000))
            .unwrap();
        assert_eq!(ledger.total_supply(), amount(1000));
        assert_eq!(ledger.balance_of(&test_address(OWNER)), amount(1000));
        assert_eq!(
            ledger.events(),
            &[TokenEvent::Transfer {
                from: Address::ZERO,
                to: test_address(OWNER),
                amount: amount(1000),
            }]
        );
    }

    #[test]
    fn mint_to_null_account_is_permitted() {
        let mut ledger = test_ledger();
        ledger
            .mint(&test_address(OWNER), &Address::ZERO, amount(1000))
            .unwrap();
        assert_eq!(ledger.balance_of(&Address::ZERO), amount(1000));
        assert_eq!(ledger.total_supply(), amount(1000));
    }

    #[test]
    fn mint_zero_is_a_no_op() {
        let mut ledger = funded_ledger();
        ledger
            .mint(&test_address(OWNER), &Address::ZERO, amount(0))
            .unwrap();
        assert_eq!(ledger.total_supply(), amount(3000));
        assert_eq!(ledger.balance_of(&Address::ZERO), amount(0));
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn mint_by_non_owner_fails() {
        let mut ledger = funded_ledger();
        let err = ledger
            .mint(&test_address(ALICE), &test_address(ALICE), amount(1000))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::Unauthorized {
                caller: test_address(ALICE)
            }
        );
        assert_eq!(ledger.balance_of(&test_address(ALICE)), amount(1000));
        assert_eq!(ledger.total_supply(), amount(3000));
    }

    #[test]
    fn mint_beyond_max_fails_atomically() {
        let mut ledger = funded_ledger();
        let err = ledger
            .mint(&test_address(OWNER), &test_address(ALICE), TokenAmount::MAX)
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::SupplyOverflow {
                supply: 3000,
                amount: u128::MAX,
            }
        );
        assert_eq!(ledger.total_supply(), amount(3000));
        assert_eq!(ledger.balance_of(&test_address(ALICE)), amount(1000));
    }

    #[test]
    fn mint_up_to_exact_max_succeeds() {
        let mut ledger = test_ledger();
        ledger
            .mint(&test_address(OWNER), &test_address(ALICE), TokenAmount::MAX)
            .unwrap();
        assert_eq!(ledger.total_supply(), TokenAmount::MAX);
        assert!(ledger
            .mint(&test_address(OWNER), &test_address(BOB), amount(1))
            .is_err());
    }

    #[test]
    fn burn_all_owned_tokens() {
        let mut ledger = funded_ledger();
        let o = test_address(OWNER);
        ledger.burn(&o, ledger.balance_of(&o)).unwrap();
        assert_eq!(ledger.balance_of(&o), amount(0));
        assert_eq!(ledger.total_supply(), amount(2000));
        assert_eq!(
            ledger.events(),
            &[TokenEvent::Transfer {
                from: o,
                to: Address::ZERO,
                amount: amount(1000),
            }]
        );
    }

    #[test]
    fn burn_zero_is_a_no_op() {
        let mut ledger = funded_ledger();
        ledger.burn(&test_address(OWNER), amount(0)).unwrap();
        assert_eq!(ledger.balance_of(&test_address(OWNER)), amount(1000));
        assert_eq!(ledger.total_supply(), amount(3000));
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn burn_more_than_balance_fails() {
        let mut ledger = funded_ledger();
        let err = ledger.burn(&test_address(OWNER), amount(2000)).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(ledger.total_supply(), amount(3000));
    }

    #[test]
    fn burn_from_spends_allowance() {
        let mut ledger = funded_ledger();
        let (o, s) = (test_address(OWNER), test_address(ALICE));
        ledger.approve(&o, &s, amount(600));
        ledger.burn_from(&s, &o, amount(250)).unwrap();
        assert_eq!(ledger.allowance(&o, &s), amount(350));
        assert_eq!(ledger.balance_of(&o), amount(750));
        assert_eq!(ledger.total_supply(), amount(2750));
        assert!(ledger.burn_from(&s, &o, amount(351)).is_err());
    }

    #[test]
    fn burn_from_with_max_allowance_keeps_it() {
        let mut ledger = funded_ledger();
        let (o, s) = (test_address(OWNER), test_address(ALICE));
        ledger.approve(&o, &s, TokenAmount::MAX);
        ledger.burn_from(&s, &o, amount(400)).unwrap();
        ledger.burn_from(&s, &o, amount(600)).unwrap();
        assert_eq!(ledger.allowance(&o, &s), TokenAmount::MAX);
        assert_eq!(ledger.balance_of(&o), amount(0));
        assert_eq!(ledger.total_supply(), amount(2000));
    }

    #[test]
    fn ownership_transfer_moves_mint_rights() {
        let mut ledger = test_ledger();
        let (old, new) = (test_address(OWNER), test_address(ALICE));
        ledger.transfer_ownership(&old, new).unwrap();
        assert_eq!(ledger.owner(), new);
        assert!(ledger.mint(&old, &old, amount(1)).is_err());
        ledger.mint(&new, &new, amount(1)).unwrap();
        assert!(ledger.transfer_ownership(&old, old).is_err());
        assert!(ledger
            .events()
            .contains(&TokenEvent::OwnershipTransferred { previous: old, new }));
    }

    #[test]
    fn renounced_ledger_cannot_mint() {
        let mut ledger = test_ledger();
        ledger.renounce_ownership(&test_address(OWNER)).unwrap();
        assert!(ledger
            .mint(&test_address(OWNER), &test_address(OWNER), amount(1))
            .is_err());
        assert_eq!(
            ledger.mint(&Address::ZERO, &test_address(ALICE), amount(1)),
            Err(TokenError::Unauthorized {
                caller: Address::ZERO
            })
        );
        assert_eq!(ledger.total_supply(), amount(0));
    }

    #[test]
    fn ownership_cannot_be_handed_to_null_account() {
        let mut ledger = test_ledger();
        let err = ledger
            .transfer_ownership(&test_address(OWNER), Address::ZERO)
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidOwner { owner: Address::ZERO });
        assert_eq!(ledger.owner(), test_address(OWNER));
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn permit_sets_allowance_and_bumps_nonce() {
        let mut ledger = test_ledger();
        let (kp, owner) = signer(11);
        let spender = test_address(ALICE);
        let digest = ledger.permit_digest(&owner, &spender, amount(1000), Timestamp::MAX);
        let sig = Ed25519Recovery::sign(&digest, &kp);

        ledger
            .permit(&owner, &spender, amount(1000), Timestamp::MAX, &sig, Timestamp::new(10))
            .unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), amount(1000));
        assert_eq!(ledger.nonces(&owner), 1);
    }

    #[test]
    fn permit_replay_fails_as_invalid_signer() {
        let mut ledger = test_ledger();
        let (kp, owner) = signer(11);
        let spender = test_address(ALICE);
        let digest = ledger.permit_digest(&owner, &spender, amount(1000), Timestamp::MAX);
        let sig = Ed25519Recovery::sign(&digest, &kp);
        let now = Timestamp::new(10);

        ledger
            .permit(&owner, &spender, amount(1000), Timestamp::MAX, &sig, now)
            .unwrap();
        ledger.approve(&owner, &spender, amount(0));

        let err = ledger
            .permit(&owner, &spender, amount(1000), Timestamp::MAX, &sig, now)
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidSigner { .. }));
        assert_eq!(ledger.nonces(&owner), 1);
        assert_eq!(ledger.allowance(&owner, &spender), amount(0));
    }

    #[test]
    fn permit_signed_by_other_key_fails() {
        let mut ledger = test_ledger();
        let (_, owner) = signer(11);
        let (mallory, mallory_addr) = signer(12);
        let spender = test_address(ALICE);
        let digest = ledger.permit_digest(&owner, &spender, amount(1000), Timestamp::MAX);
        let sig = Ed25519Recovery::sign(&digest, &mallory);

        let err = ledger
            .permit(&owner, &spender, amount(1000), Timestamp::MAX, &sig, Timestamp::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InvalidSigner {
                owner,
                recovered: Some(mallory_addr),
            }
        );
        assert_eq!(ledger.nonces(&owner), 0);
    }

    #[test]
    fn expired_permit_fails() {
        let mut ledger = test_ledger();
        let (kp, owner) = signer(11);
        let spender = test_address(ALICE);
        let deadline = Timestamp::new(100);
        let digest = ledger.permit_digest(&owner, &spender, amount(5), deadline);
        let sig = Ed25519Recovery::sign(&digest, &kp);

        let err = ledger
            .permit(&owner, &spender, amount(5), deadline, &sig, Timestamp::new(101))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::ExpiredPermit {
                deadline,
                now: Timestamp::new(101),
            }
        );
        // Exactly at the deadline is still valid.
        ledger
            .permit(&owner, &spender, amount(5), deadline, &sig, deadline)
            .unwrap();
    }

    #[test]
    fn permit_for_other_ledger_fails() {
        let mut ledger = test_ledger();
        let other = Ledger::new(
            test_address(0xEF),
            TokenInfo::new("Blackhole", "BLACK"),
            ChainId::DEV,
            test_address(OWNER),
        );
        let (kp, owner) = signer(11);
        let spender = test_address(ALICE);
        let digest = other.permit_digest(&owner, &spender, amount(5), Timestamp::MAX);
        let sig = Ed25519Recovery::sign(&digest, &kp);

        let err = ledger
            .permit(&owner, &spender, amount(5), Timestamp::MAX, &sig, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidSigner { recovered: None, .. }));
    }

    #[test]
    fn permit_signed_for_other_chain_fails() {
        let mut ledger = test_ledger();
        let sepolia = Ledger::new(
            ledger.address(),
            TokenInfo::new("Blackhole", "BLACK"),
            ChainId::SEPOLIA,
            test_address(OWNER),
        );
        let (kp, owner) = signer(11);
        let spender = test_address(ALICE);
        let digest = sepolia.permit_digest(&owner, &spender, amount(5), Timestamp::MAX);
        assert_ne!(digest, ledger.permit_digest(&owner, &spender, amount(5), Timestamp::MAX));
        let sig = Ed25519Recovery::sign(&digest, &kp);

        let err = ledger
            .permit(&owner, &spender, amount(5), Timestamp::MAX, &sig, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidSigner { recovered: None, .. }));
        assert_eq!(ledger.nonces(&owner), 0);
        assert_eq!(ledger.allowance(&owner, &spender), amount(0));
    }

    #[test]
    fn malformed_signature_fails() {
        let mut ledger = test_ledger();
        let (_, owner) = signer(11);
        let err = ledger
            .permit(&owner, &test_address(ALICE), amount(5), Timestamp::MAX, &[0u8; 10], Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidSigner { recovered: None, .. }));
    }

    #[test]
    fn custom_recovery_scheme_is_used() {
        struct AlwaysAlice;
        impl SignerRecovery for AlwaysAlice {
            fn scheme(&self) -> &'static str {
                "always-alice"
            }
            fn recover(&self, _digest: &Hash256, _signature: &[u8]) -> Option<Address> {
                Some(Address::new([ALICE; 32]))
            }
        }

        let mut ledger = Ledger::with_recovery(
            test_address(0xEE),
            TokenInfo::new("Blackhole", "BLACK"),
            ChainId::DEV,
            test_address(OWNER),
            Box::new(AlwaysAlice),
        );
        let alice = test_address(ALICE);
        ledger
            .permit(&alice, &test_address(BOB), amount(9), Timestamp::MAX, b"", Timestamp::new(0))
            .unwrap();
        assert_eq!(ledger.allowance(&alice, &test_address(BOB)), amount(9));
    }
}
