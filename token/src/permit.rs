//! Typed-message hashing and signer recovery for permits.
//!
//! The layout follows EIP-712 with Blake2b-256 as the hash function `H`:
//!
//! ```text
//! domain_separator = H(H(DOMAIN_TYPE) ‖ H(name) ‖ H(version) ‖ word(chain_id) ‖ verifying_contract)
//! struct_hash      = H(H(PERMIT_TYPE) ‖ owner ‖ spender ‖ word(value) ‖ word(nonce) ‖ word(deadline))
//! digest           = H(0x19 0x01 ‖ domain_separator ‖ struct_hash)
//! ```
//!
//! `word(x)` is the 32-byte big-endian encoding of an unsigned integer.
//! Addresses are already 32 bytes and are hashed as-is.

use blackhole_crypto::{derive_address, hash256, sign_digest, verify_digest};
use blackhole_types::{Address, ChainId, Hash256, KeyPair, PublicKey, Signature, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const PERMIT_TYPE: &str =
    "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

fn word(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// The domain a permit signature is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitDomain {
    pub name: String,
    pub version: String,
    pub chain_id: ChainId,
    pub verifying_contract: Address,
}

impl PermitDomain {
    pub fn separator(&self) -> Hash256 {
        let type_hash = hash256(&[DOMAIN_TYPE.as_bytes()]);
        let name_hash = hash256(&[self.name.as_bytes()]);
        let version_hash = hash256(&[self.version.as_bytes()]);
        hash256(&[
            type_hash.as_bytes(),
            name_hash.as_bytes(),
            version_hash.as_bytes(),
            &word(self.chain_id.as_u64() as u128),
            self.verifying_contract.as_bytes(),
        ])
    }
}

/// The signed permit message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    pub owner: Address,
    pub spender: Address,
    pub value: TokenAmount,
    pub nonce: u64,
    pub deadline: Timestamp,
}

impl Permit {
    pub fn struct_hash(&self) -> Hash256 {
        let type_hash = hash256(&[PERMIT_TYPE.as_bytes()]);
        hash256(&[
            type_hash.as_bytes(),
            self.owner.as_bytes(),
            self.spender.as_bytes(),
            &word(self.value.raw()),
            &word(self.nonce as u128),
            &word(self.deadline.as_secs() as u128),
        ])
    }

    /// The digest a signer signs, given the ledger's domain separator.
    pub fn digest(&self, domain_separator: &Hash256) -> Hash256 {
        hash256(&[
            &TYPED_DATA_PREFIX,
            domain_separator.as_bytes(),
            self.struct_hash().as_bytes(),
        ])
    }
}

/// Recovers the identity that produced a signature over a digest.
///
/// Implementations parse their own signature encoding and return `None` for
/// anything malformed or unverifiable. The ledger only compares the
/// recovered address against the claimed owner.
pub trait SignerRecovery: Send + Sync {
    /// Short name of the signature scheme, for logs.
    fn scheme(&self) -> &'static str;

    fn recover(&self, digest: &Hash256, signature: &[u8]) -> Option<Address>;
}

/// Ed25519 signer recovery.
///
/// Ed25519 has no public-key recovery, so the signature bytes carry the key:
/// `public_key (32) ‖ signature (64)`. Recovery verifies the signature under
/// that key and returns the address derived from it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Recovery;

impl Ed25519Recovery {
    pub const SIGNATURE_LEN: usize = 96;

    pub fn encode(public_key: &PublicKey, signature: &Signature) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIGNATURE_LEN);
        out.extend_from_slice(public_key.as_bytes());
        out.extend_from_slice(signature.as_bytes());
        out
    }

    /// Sign a digest and encode it in the form [`Ed25519Recovery::recover`] expects.
    pub fn sign(digest: &Hash256, keypair: &KeyPair) -> Vec<u8> {
        let signature = sign_digest(digest, &keypair.private);
        Self::encode(&keypair.public, &signature)
    }
}

impl SignerRecovery for Ed25519Recovery {
    fn scheme(&self) -> &'static str {
        "ed25519"
    }

    fn recover(&self, digest: &Hash256, signature: &[u8]) -> Option<Address> {
        if signature.len() != Self::SIGNATURE_LEN {
            return None;
        }
        let (key_bytes, sig_bytes) = signature.split_at(32);
        let public_key = PublicKey(key_bytes.try_into().ok()?);
        let signature = Signature(sig_bytes.try_into().ok()?);
        verify_digest(digest, &signature, &public_key).then(|| derive_address(&public_key))
    }
}
