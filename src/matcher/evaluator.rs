//! Exact candidate evaluation: scalar → curve point → `npub` → comparison.

use secp256k1::{PublicKey, SecretKey};

use crate::crypto::{npub, Curve};

use super::SearchTarget;

/// An accepted candidate, produced at most once per matching index.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The public-key x-coordinate that matched
    pub x_coordinate: [u8; 32],
    /// Its bech32 encoding
    pub encoded: String,
    /// Minimal byte length of the raw child scalar
    pub scalar_len: usize,
}

/// Turns child scalars into encoded candidates and applies the exact target
/// comparison. Holds only shared read-only state.
pub struct Evaluator<'a> {
    curve: &'a Curve,
    target: &'a SearchTarget,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator for `target`.
    pub fn new(curve: &'a Curve, target: &'a SearchTarget) -> Self {
        Self { curve, target }
    }

    /// Evaluates one child scalar (minimal big-endian bytes).
    ///
    /// Returns `Some` only on an exact prefix match. A scalar the curve
    /// rejects (zero, or out of range before reduction) is not a usable
    /// private key and yields `None`. An encoding failure cannot happen for
    /// a well-formed 32-byte input, so it is logged loudly instead of being
    /// silently swallowed, and still treated as a non-match.
    pub fn evaluate(&self, scalar: &[u8]) -> Option<Candidate> {
        if scalar.len() > 32 {
            return None;
        }
        let mut padded = [0u8; 32];
        padded[32 - scalar.len()..].copy_from_slice(scalar);

        let secret = SecretKey::from_slice(&padded).ok()?;
        let point = PublicKey::from_secret_key(&self.curve.secp, &secret);

        // Compressed serialization is parity byte || x; keep the 32-byte x.
        let mut x = [0u8; 32];
        x.copy_from_slice(&point.serialize()[1..]);

        if !self.target.accepts_x(&x) {
            return None;
        }

        let encoded = match npub::encode(&x) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("defect: npub encoding failed for x={}: {e}", hex::encode(x));
                return None;
            }
        };

        if !self.target.matches_encoded(&encoded) {
            return None;
        }

        Some(Candidate {
            x_coordinate: x,
            encoded,
            scalar_len: scalar.len(),
        })
    }
}
