//! The sink factory: native value in, equal token credit out.

use blackhole_crypto::contract_address;
use blackhole_token::Ledger;
use blackhole_types::{Address, NativeAmount, TokenAmount};
use tracing::{debug, info};

use crate::error::UniverseError;
use crate::event::SinkTriggered;
use crate::native::NativeBank;
use crate::sink::{SinkArena, ValueSink};

/// Deploys a fresh [`ValueSink`] per payment and credits the payer on the
/// ledger it was built for.
///
/// The factory must own that ledger for [`SinkFactory::accept`] to succeed.
#[derive(Debug)]
pub struct SinkFactory {
    address: Address,
    token: Address,
    deploy_nonce: u64,
    arena: SinkArena,
    events: Vec<SinkTriggered>,
}

impl SinkFactory {
    pub fn new(address: Address, token: Address) -> Self {
        Self {
            address,
            token,
            deploy_nonce: 0,
            arena: SinkArena::new(),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Address of the ledger this factory credits.
    pub fn token(&self) -> Address {
        self.token
    }

    pub fn sinks_created(&self) -> u64 {
        self.deploy_nonce
    }

    pub fn sink(&self, address: &Address) -> Option<&ValueSink> {
        self.arena.get(address)
    }

    pub fn sinks(&self) -> &SinkArena {
        &self.arena
    }

    pub fn events(&self) -> &[SinkTriggered] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SinkTriggered> {
        std::mem::take(&mut self.events)
    }

    /// The address the next sink will be deployed at.
    pub fn next_sink_address(&self) -> Address {
        contract_address(&self.address, self.deploy_nonce)
    }

    /// Deploy a new sink in the `Created` state.
    pub fn create_sink(&mut self) -> Result<Address, UniverseError> {
        let sink = self.next_sink_address();
        self.arena.insert(sink, self.address)?;
        self.deploy_nonce += 1;
        debug!(factory = %self.address, %sink, "sink created");
        Ok(sink)
    }

    /// Destroy `value` of the caller's native balance through a fresh sink and
    /// mint the same amount of tokens to the caller.
    ///
    /// Every precondition is checked before the first change, so on error no
    /// sink exists, no value has moved and nothing was minted.
    pub fn accept(
        &mut self,
        bank: &mut NativeBank,
        ledger: &mut Ledger,
        caller: &Address,
        value: NativeAmount,
    ) -> Result<SinkTriggered, UniverseError> {
        if ledger.address() != self.token {
            return Err(UniverseError::LedgerMismatch {
                expected: self.token,
                actual: ledger.address(),
            });
        }
        self.arena.ensure_vacant(&self.next_sink_address())?;
        bank.check_debit(caller, value)?;
        ledger.check_mint(&self.address, TokenAmount::from(value))?;

        let sink = self.create_sink()?;
        self.arena.fund(bank, &sink, caller, value)?;
        let amount = self.arena.terminate(bank, &sink)?;
        ledger.mint(&self.address, caller, TokenAmount::from(amount))?;

        let event = SinkTriggered { sink, amount };
        info!(factory = %self.address, %sink, %caller, %amount, "sink triggered");
        self.events.push(event);
        Ok(event)
    }
}
