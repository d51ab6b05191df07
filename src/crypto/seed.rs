//! BIP-39 mnemonic and seed handling.

use bip39::Mnemonic;
use rand::RngCore;

/// The NIP-06 test vector mnemonic, used as the default seed phrase.
pub const TEST_VECTOR_MNEMONIC: &str =
    "leader monkey parrot ring guide accident before fence cannon height naive bean";

/// Generates a fresh 24-word mnemonic from 256 bits of OS entropy.
pub fn generate_mnemonic() -> Result<Mnemonic, bip39::Error> {
    let mut entropy = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut entropy);
    Mnemonic::from_entropy(&entropy)
}

/// Converts a mnemonic phrase into the 64-byte derivation seed.
///
/// NIP-06 uses an empty passphrase.
pub fn seed_from_mnemonic(words: &str) -> Result<[u8; 64], bip39::Error> {
    let mnemonic = Mnemonic::parse(words)?;
    Ok(mnemonic.to_seed(""))
}
