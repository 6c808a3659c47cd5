//! The Blackhole token ledger.
//!
//! A single fungible ledger with:
//! - balances, allowances and total supply with a hard cap at `TokenAmount::MAX`
//! - owner-gated minting through an explicit [`Ownable`] capability
//! - signature-based approvals ([`permit`]) bound to a domain of
//!   `(name, version, chain id, ledger address)` and a per-owner nonce
//!
//! Every operation is all-or-nothing: a returned error means no state changed.

pub mod access;
pub mod error;
pub mod event;
pub mod ledger;
pub mod permit;

pub use access::Ownable;
pub use error::TokenError;
pub use event::TokenEvent;
pub use ledger::{Ledger, TokenInfo};
pub use permit::{Ed25519Recovery, Permit, PermitDomain, SignerRecovery};
