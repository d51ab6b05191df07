//! BIP-32 path derivation producing per-worker base nodes.
//!
//! Only the subset needed here is implemented: master key generation from a
//! seed and single child steps (hardened and non-hardened). The search hot
//! path does not go through this module; it uses [`crate::derive`], which
//! cross-checks against the generic step implemented here.

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use secp256k1::{PublicKey, SecretKey};
use sha2::Sha512;

use super::Curve;

type HmacSha512 = Hmac<Sha512>;

/// Start of the hardened index space ($2^{31}$).
///
/// Doubles as the exclusive upper bound of the non-hardened child index
/// domain enumerated by the search loop.
pub const FIRST_HARDENED_INDEX: u32 = 0x8000_0000;

/// Returns the hardened form of a path segment.
pub const fn hardened(index: u32) -> u32 {
    index | FIRST_HARDENED_INDEX
}

/// Errors raised while deriving a base node.
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("seed produced an invalid master key")]
    InvalidMasterKey,
    #[error("derivation produced an invalid key at segment {index:#x}")]
    InvalidChildKey { index: u32 },
}

/// A derivation-tree node: private key plus chain code.
///
/// One base node is derived per worker; it is immutable after creation.
#[derive(Clone)]
pub struct BaseNode {
    private_key: [u8; 32],
    chain_code: [u8; 32],
}

impl BaseNode {
    /// Derives the node at `path` from a seed.
    ///
    /// Segments with the high bit set (see [`hardened`]) use hardened
    /// derivation; the rest use the public non-hardened step.
    pub fn from_seed(curve: &Curve, seed: &[u8], path: &[u32]) -> Result<Self, DeriveError> {
        let digest = hmac_sha512(b"Bitcoin seed", seed);

        let key_int = BigUint::from_bytes_be(&digest[..32]);
        if key_int == BigUint::default() || key_int >= curve.order {
            return Err(DeriveError::InvalidMasterKey);
        }

        let mut node = Self {
            private_key: digest[..32].try_into().expect("digest is 64 bytes"),
            chain_code: digest[32..].try_into().expect("digest is 64 bytes"),
        };
        for &segment in path {
            node = node.derive_child(curve, segment)?;
        }
        Ok(node)
    }

    /// Performs one BIP-32 child step.
    pub fn derive_child(&self, curve: &Curve, index: u32) -> Result<Self, DeriveError> {
        let mut data = [0u8; 37];
        if index >= FIRST_HARDENED_INDEX {
            // Hardened: 0x00 || parent private key || index
            data[1..33].copy_from_slice(&self.private_key);
        } else {
            // Non-hardened: compressed parent public key || index
            data[..33].copy_from_slice(&self.public_key(curve)?.serialize());
        }
        data[33..].copy_from_slice(&index.to_be_bytes());

        let digest = hmac_sha512(&self.chain_code, &data);

        let tweak = BigUint::from_bytes_be(&digest[..32]);
        if tweak >= curve.order {
            return Err(DeriveError::InvalidChildKey { index });
        }
        let child = (tweak + BigUint::from_bytes_be(&self.private_key)) % &curve.order;
        if child == BigUint::default() {
            return Err(DeriveError::InvalidChildKey { index });
        }

        Ok(Self {
            private_key: scalar_bytes(&child),
            chain_code: digest[32..].try_into().expect("digest is 64 bytes"),
        })
    }

    /// Returns the node's public point.
    pub fn public_key(&self, curve: &Curve) -> Result<PublicKey, DeriveError> {
        let secret = SecretKey::from_slice(&self.private_key)
            .map_err(|_| DeriveError::InvalidMasterKey)?;
        Ok(PublicKey::from_secret_key(&curve.secp, &secret))
    }

    /// Returns the 32-byte private key.
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Returns the 32-byte chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }
}

/// Left-pads a scalar to a fixed 32-byte big-endian representation.
pub(crate) fn scalar_bytes(value: &BigUint) -> [u8; 32] {
    let raw = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(&raw);
    out
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}
