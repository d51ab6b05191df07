//! bech32 `npub` encoding of public-key x-coordinates (NIP-19).

use bech32::{FromBase32, ToBase32, Variant};

/// Human-readable part of an encoded public key.
pub const HRP: &str = "npub";

/// Errors raised while decoding an `npub` string.
#[derive(Debug, thiserror::Error)]
pub enum NpubError {
    #[error("bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
    #[error("unexpected prefix {0:?}")]
    WrongHrp(String),
    #[error("decoded payload is not 32 bytes")]
    BadLength,
}

/// Encodes a 32-byte x-coordinate as `npub1…`.
pub fn encode(x: &[u8; 32]) -> Result<String, bech32::Error> {
    bech32::encode(HRP, x.to_base32(), Variant::Bech32)
}

/// Decodes an `npub1…` string back into the 32-byte x-coordinate.
pub fn decode(s: &str) -> Result<[u8; 32], NpubError> {
    let (hrp, data, variant) = bech32::decode(s)?;
    if hrp != HRP || variant != Variant::Bech32 {
        return Err(NpubError::WrongHrp(hrp));
    }
    let bytes = Vec::<u8>::from_base32(&data)?;
    bytes.try_into().map_err(|_| NpubError::BadLength)
}
