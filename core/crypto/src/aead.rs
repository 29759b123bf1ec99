//! Authenticated encryption using AES-256-GCM.
//!
//! The envelope always carries a 24-byte IV. How much of it reaches the
//! cipher is selected by [`NonceMode`].

use aes_gcm::aead::consts::U24;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{Aes256Gcm, AesGcm};
use serde::{Deserialize, Serialize};

use crate::keys::{DerivedKey, Iv};
use sealbox_common::{Error, Result};

/// Standard GCM nonce size (96 bits).
pub const GCM_NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM driven by the whole 24-byte IV.
type Aes256GcmFullIv = AesGcm<Aes256, U24>;

/// How the 24-byte envelope IV is presented to GCM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceMode {
    /// The first 12 IV bytes are the GCM nonce; the remaining 12 are
    /// carried in the envelope but not authenticated.
    #[default]
    Truncated,
    /// All 24 IV bytes go to GCM, which hashes them into the initial
    /// counter block (NIST SP 800-38D, non-96-bit IV). Matches JCE
    /// providers handed a 24-byte `GCMParameterSpec`.
    FullIv,
}

/// Seal plaintext with AES-256-GCM.
///
/// # Postconditions
/// - Returns ciphertext || tag
/// - The output length is plaintext length + TAG_SIZE
///
/// # Errors
/// - `Error::InvalidInput` if the plaintext exceeds the GCM length limit
pub fn seal(key: &DerivedKey, iv: &Iv, mode: NonceMode, plaintext: &[u8]) -> Result<Vec<u8>> {
    let sealed = match mode {
        NonceMode::Truncated => {
            encrypt_with::<Aes256Gcm>(key, &iv.as_bytes()[..GCM_NONCE_SIZE], plaintext)
        }
        NonceMode::FullIv => encrypt_with::<Aes256GcmFullIv>(key, iv.as_bytes(), plaintext),
    };

    sealed.map_err(|_| Error::InvalidInput("Plaintext too large for AES-GCM".to_string()))
}

/// Open ciphertext || tag sealed by [`seal`].
///
/// # Errors
/// - `Error::Decryption` on any authentication failure, including a sealed
///   payload shorter than the tag
///
/// # Security
/// - Authenticates before returning any plaintext
pub fn open(key: &DerivedKey, iv: &Iv, mode: NonceMode, sealed: &[u8]) -> Result<Vec<u8>> {
    let opened = match mode {
        NonceMode::Truncated => {
            decrypt_with::<Aes256Gcm>(key, &iv.as_bytes()[..GCM_NONCE_SIZE], sealed)
        }
        NonceMode::FullIv => decrypt_with::<Aes256GcmFullIv>(key, iv.as_bytes(), sealed),
    };

    opened.map_err(|_| Error::Decryption)
}

fn encrypt_with<C: Aead + KeyInit>(
    key: &DerivedKey,
    nonce: &[u8],
    plaintext: &[u8],
) -> std::result::Result<Vec<u8>, aes_gcm::Error> {
    let cipher = C::new(GenericArray::from_slice(key.as_bytes()));
    cipher.encrypt(GenericArray::from_slice(nonce), plaintext)
}

fn decrypt_with<C: Aead + KeyInit>(
    key: &DerivedKey,
    nonce: &[u8],
    sealed: &[u8],
) -> std::result::Result<Vec<u8>, aes_gcm::Error> {
    let cipher = C::new(GenericArray::from_slice(key.as_bytes()));
    cipher.decrypt(GenericArray::from_slice(nonce), sealed)
}
