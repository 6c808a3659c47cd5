//! Single-use value sinks.

use std::collections::BTreeMap;

use blackhole_types::{Address, NativeAmount};
use serde::{Deserialize, Serialize};

use crate::error::UniverseError;
use crate::native::NativeBank;

/// Lifecycle of a sink. `Destroyed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SinkState {
    Created,
    Funded { value: NativeAmount },
    Destroyed { amount: NativeAmount },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSink {
    pub address: Address,
    /// The factory that deployed this sink.
    pub creator: Address,
    pub state: SinkState,
}

impl ValueSink {
    pub fn is_consumed(&self) -> bool {
        !matches!(self.state, SinkState::Created)
    }
}

/// Records of every sink a factory has deployed, keyed by address.
///
/// Records are kept after destruction so a consumed sink stays detectable;
/// they are never reused.
#[derive(Debug, Default)]
pub struct SinkArena {
    sinks: BTreeMap<Address, ValueSink>,
}

impl SinkArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn get(&self, address: &Address) -> Option<&ValueSink> {
        self.sinks.get(address)
    }

    /// Check that no sink has ever been recorded at `address`.
    pub fn ensure_vacant(&self, address: &Address) -> Result<(), UniverseError> {
        if self.sinks.contains_key(address) {
            return Err(UniverseError::SinkExists(*address));
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, address: Address, creator: Address) -> Result<(), UniverseError> {
        self.ensure_vacant(&address)?;
        self.sinks.insert(
            address,
            ValueSink {
                address,
                creator,
                state: SinkState::Created,
            },
        );
        Ok(())
    }

    /// Check that `address` is a sink that can still receive a payment.
    pub fn ensure_fundable(&self, address: &Address) -> Result<(), UniverseError> {
        match self.sinks.get(address) {
            None => Err(UniverseError::UnknownSink(*address)),
            Some(sink) if sink.is_consumed() => Err(UniverseError::SinkConsumed(*address)),
            Some(_) => Ok(()),
        }
    }

    /// Move `value` from `payer` into the sink.
    pub fn fund(
        &mut self,
        bank: &mut NativeBank,
        address: &Address,
        payer: &Address,
        value: NativeAmount,
    ) -> Result<(), UniverseError> {
        self.ensure_fundable(address)?;
        bank.transfer(payer, address, value)?;
        if let Some(sink) = self.sinks.get_mut(address) {
            sink.state = SinkState::Funded { value };
        }
        Ok(())
    }

    /// Self-terminate a sink, destroying exactly the value it was funded with.
    ///
    /// Anything else sitting at the sink address is left where it is.
    pub fn terminate(
        &mut self,
        bank: &mut NativeBank,
        address: &Address,
    ) -> Result<NativeAmount, UniverseError> {
        let sink = self
            .sinks
            .get_mut(address)
            .ok_or(UniverseError::UnknownSink(*address))?;
        let amount = match sink.state {
            SinkState::Created => NativeAmount::ZERO,
            SinkState::Funded { value } => value,
            SinkState::Destroyed { .. } => return Err(UniverseError::SinkConsumed(*address)),
        };
        bank.destroy(address, amount)?;
        sink.state = SinkState::Destroyed { amount };
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        Address::new([n; 32])
    }

    fn funded_bank() -> NativeBank {
        let mut bank = NativeBank::new();
        bank.credit(&test_address(1), NativeAmount::new(100)).unwrap();
        bank
    }

    #[test]
    fn lifecycle_created_funded_destroyed() {
        let mut bank = funded_bank();
        let mut arena = SinkArena::new();
        let sink = test_address(0xA0);
        arena.insert(sink, test_address(0xFF)).unwrap();
        assert_eq!(arena.get(&sink).map(|s| s.state), Some(SinkState::Created));

        arena
            .fund(&mut bank, &sink, &test_address(1), NativeAmount::new(25))
            .unwrap();
        assert_eq!(
            arena.get(&sink).map(|s| s.state),
            Some(SinkState::Funded {
                value: NativeAmount::new(25)
            })
        );

        let destroyed = arena.terminate(&mut bank, &sink).unwrap();
        assert_eq!(destroyed, NativeAmount::new(25));
        assert_eq!(bank.balance_of(&sink), NativeAmount::ZERO);
        assert_eq!(bank.destroyed(), NativeAmount::new(25));
    }

    #[test]
    fn sink_cannot_be_funded_twice() {
        let mut bank = funded_bank();
        let mut arena = SinkArena::new();
        let sink = test_address(0xA0);
        arena.insert(sink, test_address(0xFF)).unwrap();
        arena
            .fund(&mut bank, &sink, &test_address(1), NativeAmount::new(10))
            .unwrap();

        let err = arena
            .fund(&mut bank, &sink, &test_address(1), NativeAmount::new(10))
            .unwrap_err();
        assert_eq!(err, UniverseError::SinkConsumed(sink));
        assert_eq!(bank.balance_of(&test_address(1)), NativeAmount::new(90));

        arena.terminate(&mut bank, &sink).unwrap();
        assert_eq!(
            arena.fund(&mut bank, &sink, &test_address(1), NativeAmount::new(1)),
            Err(UniverseError::SinkConsumed(sink))
        );
        assert_eq!(
            arena.terminate(&mut bank, &sink),
            Err(UniverseError::SinkConsumed(sink))
        );
    }

    #[test]
    fn unknown_sink_is_rejected() {
        let mut bank = funded_bank();
        let mut arena = SinkArena::new();
        let nowhere = test_address(0xB0);
        assert_eq!(
            arena.fund(&mut bank, &nowhere, &test_address(1), NativeAmount::new(1)),
            Err(UniverseError::UnknownSink(nowhere))
        );
        assert_eq!(
            arena.terminate(&mut bank, &nowhere),
            Err(UniverseError::UnknownSink(nowhere))
        );
    }

    #[test]
    fn failed_funding_keeps_sink_created() {
        let mut bank = funded_bank();
        let mut arena = SinkArena::new();
        let sink = test_address(0xA0);
        arena.insert(sink, test_address(0xFF)).unwrap();
        assert!(arena
            .fund(&mut bank, &sink, &test_address(1), NativeAmount::new(1000))
            .is_err());
        assert!(!arena.get(&sink).is_some_and(ValueSink::is_consumed));
    }

    #[test]
    fn terminate_ignores_value_sent_to_the_address_directly() {
        let mut bank = funded_bank();
        let mut arena = SinkArena::new();
        let sink = test_address(0xA0);
        bank.transfer(&test_address(1), &sink, NativeAmount::new(50)).unwrap();
        arena.insert(sink, test_address(0xFF)).unwrap();
        arena
            .fund(&mut bank, &sink, &test_address(1), NativeAmount::new(10))
            .unwrap();

        assert_eq!(arena.terminate(&mut bank, &sink), Ok(NativeAmount::new(10)));
        assert_eq!(bank.destroyed(), NativeAmount::new(10));
        assert_eq!(bank.balance_of(&sink), NativeAmount::new(50));
    }

    #[test]
    fn insert_refuses_an_address_already_held() {
        let mut arena = SinkArena::new();
        let sink = test_address(0xA0);
        arena.insert(sink, test_address(0xFF)).unwrap();
        assert_eq!(
            arena.insert(sink, test_address(0xFE)),
            Err(UniverseError::SinkExists(sink))
        );
        assert_eq!(arena.get(&sink).map(|s| s.creator), Some(test_address(0xFF)));
        assert_eq!(arena.len(), 1);
    }
}
