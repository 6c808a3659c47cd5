//! Address derivation.
//!
//! Key-holder address: `Blake2b-256("blackhole/account" ‖ public_key)`.
//! Component address: `Blake2b-256("blackhole/contract" ‖ deployer ‖ nonce_be)`,
//! so every deployment by the same deployer gets a fresh, predictable address.

use blackhole_types::{Address, PublicKey};

use crate::hash::blake2b_256_multi;

const ACCOUNT_TAG: &[u8] = b"blackhole/account";
const CONTRACT_TAG: &[u8] = b"blackhole/contract";

/// Derive the address controlled by a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    Address::new(blake2b_256_multi(&[ACCOUNT_TAG, public_key.as_bytes()]))
}

/// Derive the address of the `nonce`-th component deployed by `deployer`.
pub fn contract_address(deployer: &Address, nonce: u64) -> Address {
    Address::new(blake2b_256_multi(&[
        CONTRACT_TAG,
        deployer.as_bytes(),
        &nonce.to_be_bytes(),
    ]))
}
