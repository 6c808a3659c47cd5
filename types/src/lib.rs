//! Fundamental types for the Blackhole token.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, token and native amounts, digests, key material, timestamps and the
//! chain identifier used for permit domain separation.

pub mod address;
pub mod amount;
pub mod chain;
pub mod error;
pub mod hash;
pub mod keys;
pub mod time;

pub use address::Address;
pub use amount::{NativeAmount, TokenAmount};
pub use chain::ChainId;
pub use error::BlackholeError;
pub use hash::Hash256;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::{Clock, SystemClock, Timestamp};
