//! Fast non-hardened child-scalar derivation (the search hot path).
//!
//! A generic BIP-32 step rebuilds the HMAC input and re-keys the hash on
//! every call. This deriver instead prepares everything that is constant for
//! a base node exactly once:
//!
//! - a 37-byte buffer holding `compressed public key || child index`, of
//!   which only the trailing 4 index bytes are rewritten per iteration
//!   (bytes `[0..33)` never change after construction);
//! - an HMAC-SHA512 context keyed with the chain code, reset rather than
//!   reconstructed between iterations;
//! - the parent private key and curve order as big integers.
//!
//! Per index the remaining work is one HMAC block and one modular addition.

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use sha2::Sha512;

use crate::crypto::{BaseNode, Curve, DeriveError};

type HmacSha512 = Hmac<Sha512>;

/// Offset of the child-index suffix inside the derivation buffer.
const INDEX_OFFSET: usize = 33;

/// Derives child scalars for one base node across the non-hardened index
/// range. Worker-local; nothing here is shared.
pub struct ChildDeriver {
    buf: [u8; 37],
    mac: HmacSha512,
    parent_key: BigUint,
    order: BigUint,
}

impl ChildDeriver {
    /// Prepares the reusable state for `node`.
    pub fn new(curve: &Curve, node: &BaseNode) -> Result<Self, DeriveError> {
        let mut buf = [0u8; 37];
        buf[..INDEX_OFFSET].copy_from_slice(&node.public_key(curve)?.serialize());

        let mac = HmacSha512::new_from_slice(node.chain_code())
            .expect("HMAC accepts any key length");

        Ok(Self {
            buf,
            mac,
            parent_key: BigUint::from_bytes_be(node.private_key()),
            order: curve.order.clone(),
        })
    }

    /// Computes the child scalar `(IL + parent_key) mod n` at `index`.
    ///
    /// Returns the scalar as minimal big-endian bytes (leading zeros
    /// stripped); the heuristic filter is defined on that length. The caller
    /// left-pads back to 32 bytes before treating it as a private key.
    pub fn scalar_at(&mut self, index: u32) -> Vec<u8> {
        self.buf[INDEX_OFFSET..].copy_from_slice(&index.to_be_bytes());
        self.mac.update(&self.buf);
        let digest = self.mac.finalize_reset().into_bytes();

        let mut scalar = BigUint::from_bytes_be(&digest[..32]);
        scalar += &self.parent_key;
        scalar %= &self.order;
        scalar.to_bytes_be()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::node::hardened;
    use crate::crypto::seed;

    fn worker0_deriver(curve: &Curve) -> (BaseNode, ChildDeriver) {
        let seed = seed::seed_from_mnemonic(seed::TEST_VECTOR_MNEMONIC).unwrap();
        let node = BaseNode::from_seed(
            curve,
            &seed,
            &[hardened(44), hardened(1237), hardened(0), 8],
        )
        .unwrap();
        let deriver = ChildDeriver::new(curve, &node).unwrap();
        (node, deriver)
    }

    #[test]
    fn test_known_scalar_at_index_zero() {
        let curve = Curve::new();
        let (_, mut deriver) = worker0_deriver(&curve);
        assert_eq!(
            hex::encode(deriver.scalar_at(0)),
            "2a42041781b67bb8f4db43afe2c017cb915df04dfa9042978724914f5fc60e1d"
        );
    }

    #[test]
    fn test_deterministic() {
        let curve = Curve::new();
        let (_, mut deriver) = worker0_deriver(&curve);
        let first = deriver.scalar_at(42);
        // Interleave other indices to prove the reset leaves no state behind.
        deriver.scalar_at(7);
        deriver.scalar_at(1_000_000);
        assert_eq!(deriver.scalar_at(42), first);
    }

    #[test]
    fn test_distinct_indices_distinct_scalars() {
        let curve = Curve::new();
        let (_, mut deriver) = worker0_deriver(&curve);
        let scalars: Vec<_> = (0..64).map(|i| deriver.scalar_at(i)).collect();
        for (i, a) in scalars.iter().enumerate() {
            for b in &scalars[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_matches_generic_child_step() {
        // The fast path must agree with the generic BIP-32 derivation.
        let curve = Curve::new();
        let (node, mut deriver) = worker0_deriver(&curve);
        for index in [0u32, 1, 2, 3, 90, 513] {
            let child = node.derive_child(&curve, index).unwrap();
            let mut padded = [0u8; 32];
            let scalar = deriver.scalar_at(index);
            padded[32 - scalar.len()..].copy_from_slice(&scalar);
            assert_eq!(&padded, child.private_key(), "index {index}");
        }
    }

    #[test]
    fn test_short_scalar_has_minimal_length() {
        // Index 90 on the test-vector base node yields a 31-byte scalar.
        let curve = Curve::new();
        let (_, mut deriver) = worker0_deriver(&curve);
        assert_eq!(deriver.scalar_at(90).len(), 31);
        assert_eq!(deriver.scalar_at(0).len(), 32);
    }
}
