//! Ed25519 signing over 32-byte digests.

use blackhole_types::{Hash256, PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Sign a digest with a private key.
pub fn sign_digest(digest: &Hash256, private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(digest.as_bytes()).to_bytes())
}

/// Verify a signature over a digest.
///
/// Uses strict verification, so malleable (non-canonical) signatures and
/// weak public keys are rejected.
pub fn verify_digest(digest: &Hash256, signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(digest.as_bytes(), &sig).is_ok()
}
