//! Blake2b-256 hashing.

use blackhole_types::Hash256;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// Hash multiple byte slices in sequence without concatenating them first.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash a sequence of parts into a typed [`Hash256`].
pub fn hash256(parts: &[&[u8]]) -> Hash256 {
    Hash256::new(blake2b_256_multi(parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        assert_eq!(blake2b_256(b"blackhole"), blake2b_256(b"blackhole"));
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"matter"), blake2b_256(b"antimatter"));
    }

    #[test]
    fn blake2b_multi_equivalent_to_concatenation() {
        let single = blake2b_256(b"eventhorizon");
        let multi = blake2b_256_multi(&[b"event", b"horizon"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn hash256_wraps_multi() {
        let h = hash256(&[b"a", b"b"]);
        assert_eq!(h.as_bytes(), &blake2b_256(b"ab"));
        assert!(!h.is_zero());
    }
}
