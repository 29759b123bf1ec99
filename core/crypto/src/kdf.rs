//! Key derivation using PBKDF2-HMAC-SHA-256.
//!
//! The hash and round count are fixed so that any two implementations given
//! the same passphrase and salt derive the same key.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::keys::{DerivedKey, Salt, KEY_LENGTH};
use sealbox_common::{Error, Result};

/// PBKDF2 round count. Part of the wire contract, not a tuning knob.
pub const PBKDF2_ITERATIONS: u32 = 128_455;

/// Derive a 256-bit key from a passphrase and salt.
///
/// # Postconditions
/// - The derived key is deterministic given the same inputs
///
/// # Errors
/// - `Error::KeyDerivation` if the PBKDF2 primitive rejects its parameters,
///   which does not happen for the fixed parameters used here
///
/// # Security
/// - Passphrase is not stored or logged
/// - The intermediate key buffer is zeroized
pub fn derive_key(passphrase: &[u8], salt: &Salt) -> Result<DerivedKey> {
    derive_key_with_rounds(passphrase, salt.as_bytes(), PBKDF2_ITERATIONS)
}

fn derive_key_with_rounds(passphrase: &[u8], salt: &[u8], rounds: u32) -> Result<DerivedKey> {
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2::<Hmac<Sha256>>(passphrase, salt, rounds, &mut key_bytes)
        .map_err(|e| Error::KeyDerivation(format!("PBKDF2 failed: {}", e)))?;

    let key = DerivedKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}
