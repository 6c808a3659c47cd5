//! In-memory host that owns every deployed component.

use std::collections::HashMap;
use std::sync::Arc;

use blackhole_crypto::contract_address;
use blackhole_token::{Ledger, SignerRecovery, TokenInfo};
use blackhole_types::{Address, ChainId, Clock, NativeAmount, Timestamp, TokenAmount};
use tracing::info;

use crate::error::UniverseError;
use crate::event::SinkTriggered;
use crate::factory::SinkFactory;
use crate::native::NativeBank;

/// The execution environment: chain id, clock, native value and components.
///
/// Every call takes `&mut self` and either completes or fails without effect.
pub struct World {
    chain_id: ChainId,
    clock: Arc<dyn Clock>,
    bank: NativeBank,
    deploy_nonces: HashMap<Address, u64>,
    ledgers: HashMap<Address, Ledger>,
    factories: HashMap<Address, SinkFactory>,
}

impl World {
    pub fn new(chain_id: ChainId, clock: Arc<dyn Clock>) -> Self {
        Self {
            chain_id,
            clock,
            bank: NativeBank::new(),
            deploy_nonces: HashMap::new(),
            ledgers: HashMap::new(),
            factories: HashMap::new(),
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn bank(&self) -> &NativeBank {
        &self.bank
    }

    pub fn native_balance(&self, account: &Address) -> NativeAmount {
        self.bank.balance_of(account)
    }

    /// Issue native value out of thin air, e.g. for genesis balances.
    pub fn fund(&mut self, account: &Address, amount: NativeAmount) -> Result<(), UniverseError> {
        self.bank.credit(account, amount)
    }

    fn allocate_address(&mut self, deployer: &Address) -> Address {
        let nonce = self.deploy_nonces.entry(*deployer).or_insert(0);
        let address = contract_address(deployer, *nonce);
        *nonce += 1;
        address
    }

    /// Deploy a ledger owned by `deployer`, verifying permits with Ed25519.
    pub fn deploy_ledger(&mut self, deployer: &Address, info: TokenInfo) -> Address {
        let address = self.allocate_address(deployer);
        info!(%deployer, %address, name = %info.name, "ledger deployed");
        let ledger = Ledger::new(address, info, self.chain_id, *deployer);
        self.ledgers.insert(address, ledger);
        address
    }

    /// Deploy a ledger owned by `deployer` that recovers permit signers with `recovery`.
    pub fn deploy_ledger_with_recovery(
        &mut self,
        deployer: &Address,
        info: TokenInfo,
        recovery: Box<dyn SignerRecovery>,
    ) -> Address {
        let address = self.allocate_address(deployer);
        info!(%deployer, %address, name = %info.name, scheme = recovery.scheme(), "ledger deployed");
        let ledger = Ledger::with_recovery(address, info, self.chain_id, *deployer, recovery);
        self.ledgers.insert(address, ledger);
        address
    }

    /// Deploy a factory crediting the ledger at `token`.
    ///
    /// The factory cannot mint until the ledger's owner hands ownership to it.
    pub fn deploy_factory(
        &mut self,
        deployer: &Address,
        token: &Address,
    ) -> Result<Address, UniverseError> {
        if !self.ledgers.contains_key(token) {
            return Err(UniverseError::UnknownContract(*token));
        }
        let address = self.allocate_address(deployer);
        info!(%deployer, %address, %token, "sink factory deployed");
        self.factories
            .insert(address, SinkFactory::new(address, *token));
        Ok(address)
    }

    pub fn ledger(&self, address: &Address) -> Option<&Ledger> {
        self.ledgers.get(address)
    }

    pub fn ledger_mut(&mut self, address: &Address) -> Result<&mut Ledger, UniverseError> {
        self.ledgers
            .get_mut(address)
            .ok_or(UniverseError::UnknownContract(*address))
    }

    pub fn factory(&self, address: &Address) -> Option<&SinkFactory> {
        self.factories.get(address)
    }

    /// Token balance of `account` on the ledger at `token`.
    pub fn token_balance(&self, token: &Address, account: &Address) -> TokenAmount {
        self.ledger(token)
            .map(|ledger| ledger.balance_of(account))
            .unwrap_or_default()
    }

    /// Send native value from `from` to `to`.
    ///
    /// A send to a factory address is a call to [`SinkFactory::accept`] and
    /// returns the resulting event; any other destination is a plain balance
    /// move and returns `None`.
    pub fn send_value(
        &mut self,
        from: &Address,
        to: &Address,
        value: NativeAmount,
    ) -> Result<Option<SinkTriggered>, UniverseError> {
        match self.factories.get_mut(to) {
            Some(factory) => {
                let token = factory.token();
                let ledger = self
                    .ledgers
                    .get_mut(&token)
                    .ok_or(UniverseError::UnknownContract(token))?;
                factory.accept(&mut self.bank, ledger, from, value).map(Some)
            }
            None => {
                self.bank.transfer(from, to, value)?;
                Ok(None)
            }
        }
    }

    /// Submit a permit to the ledger at `token`, checked against the world clock.
    pub fn permit(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        value: TokenAmount,
        deadline: Timestamp,
        signature: &[u8],
    ) -> Result<(), UniverseError> {
        let now = self.clock.now();
        self.ledger_mut(token)?
            .permit(owner, spender, value, deadline, signature, now)?;
        Ok(())
    }
}
