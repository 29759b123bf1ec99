//! Password-based encryption of text into encoded envelopes.
//!
//! Every call supplies its own passphrase and draws its own salt and IV,
//! so a [`Cryptor`] carries configuration only and can be shared freely
//! across threads.

use zeroize::Zeroize;

use crate::aead::{self, NonceMode};
use crate::envelope::Envelope;
use crate::kdf::derive_key;
use crate::keys::{Iv, Salt};
use sealbox_common::{Error, Passphrase, Result};

/// Encryption engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cryptor {
    nonce_mode: NonceMode,
}

impl Cryptor {
    /// Create an engine using the given nonce mode.
    pub fn new(nonce_mode: NonceMode) -> Self {
        Self { nonce_mode }
    }

    pub fn nonce_mode(&self) -> NonceMode {
        self.nonce_mode
    }

    /// Encrypt text into a Base64 envelope.
    ///
    /// # Postconditions
    /// - A fresh random salt and IV are used; encrypting the same input
    ///   twice yields different output
    /// - `decrypt` with the same passphrase returns `plaintext`
    ///
    /// # Errors
    /// - `Error::KeyDerivation` if PBKDF2 fails
    pub fn encrypt(&self, plaintext: &str, passphrase: &Passphrase) -> Result<String> {
        self.encrypt_with(plaintext, passphrase, &Iv::generate(), &Salt::generate())
    }

    /// Encrypt with a caller-chosen IV and salt.
    ///
    /// # Warning
    /// Only for reproducing known vectors. Reusing an IV with the same
    /// passphrase and salt breaks both confidentiality and authenticity.
    pub fn encrypt_with(
        &self,
        plaintext: &str,
        passphrase: &Passphrase,
        iv: &Iv,
        salt: &Salt,
    ) -> Result<String> {
        let key = derive_key(passphrase.as_bytes(), salt)?;
        let sealed = aead::seal(&key, iv, self.nonce_mode, plaintext.as_bytes())?;
        Ok(Envelope::new(*iv, *salt, sealed).to_text())
    }

    /// Decrypt a Base64 envelope back to text.
    ///
    /// # Errors
    /// - `Error::MalformedEnvelope` if the input is not a valid envelope
    /// - `Error::Decryption` for a wrong passphrase or corrupted data
    pub fn decrypt(&self, encoded: &str, passphrase: &Passphrase) -> Result<String> {
        let envelope = Envelope::from_text(encoded)?;
        self.open(&envelope, passphrase)
    }

    /// Decrypt an already decoded envelope.
    pub fn open(&self, envelope: &Envelope, passphrase: &Passphrase) -> Result<String> {
        let key = derive_key(passphrase.as_bytes(), envelope.salt())?;
        let plaintext = aead::open(&key, envelope.iv(), self.nonce_mode, envelope.sealed())?;

        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            Error::MalformedEnvelope("decrypted payload is not valid UTF-8".to_string())
        })
    }
}

/// Encrypt with the default engine.
pub fn encrypt(plaintext: &str, passphrase: &Passphrase) -> Result<String> {
    Cryptor::default().encrypt(plaintext, passphrase)
}

/// Decrypt with the default engine.
pub fn decrypt(encoded: &str, passphrase: &Passphrase) -> Result<String> {
    Cryptor::default().decrypt(encoded, passphrase)
}
