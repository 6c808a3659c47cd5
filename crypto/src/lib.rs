//! Cryptographic primitives for Blackhole.
//!
//! - **Ed25519** for permit signatures
//! - **Blake2b-256** for typed-message hashing and address derivation
//! - Deterministic addresses for key holders and deployed components

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{contract_address, derive_address};
pub use hash::{blake2b_256, blake2b_256_multi, hash256};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_digest, verify_digest};
