//! Cryptographic services backing the search.
//!
//! This module provides:
//! - BIP-39 seed handling (`seed`)
//! - BIP-32 hardened path derivation to per-worker base nodes (`node`)
//! - bech32 `npub` encoding of x-coordinates (`npub`)

pub mod node;
pub mod npub;
pub mod seed;

use num_bigint::BigUint;
use secp256k1::{All, Secp256k1};

pub use node::{BaseNode, DeriveError};

/// Process-wide curve parameters, constructed once at startup and passed
/// to every component instead of living as ambient global state.
pub struct Curve {
    /// secp256k1 context used for point multiplication
    pub secp: Secp256k1<All>,
    /// Group order of the secp256k1 base point
    pub order: BigUint,
}

impl Curve {
    /// Creates the curve context.
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
            order: BigUint::from_bytes_be(&secp256k1::constants::CURVE_ORDER),
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::new()
    }
}
