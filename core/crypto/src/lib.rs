//! Cryptographic primitives for SealBox.
//!
//! This module provides:
//! - Key derivation using PBKDF2-HMAC-SHA-256
//! - Authenticated encryption using AES-256-GCM
//! - The `IV ‖ Salt ‖ Sealed` envelope and its Base64 text form
//! - A stateless engine tying the three together for text payloads
//!
//! # Security Guarantees
//! - A fresh random salt and IV are drawn for every encryption
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Authentication failures are reported as one indistinguishable error
//!
//! # Wire format
//! None of the algorithm parameters are stored in the envelope. Readers and
//! writers agree on AES-256-GCM with a 128-bit tag, PBKDF2-HMAC-SHA-256 at
//! [`PBKDF2_ITERATIONS`] rounds, and the [`NonceMode`] in use.

pub mod aead;
pub mod engine;
pub mod envelope;
pub mod kdf;
pub mod keys;

pub use aead::NonceMode;
pub use engine::{decrypt, encrypt, Cryptor};
pub use envelope::{Envelope, HEADER_SIZE};
pub use kdf::{derive_key, PBKDF2_ITERATIONS};
pub use keys::{DerivedKey, Iv, Salt, IV_LENGTH, KEY_LENGTH, SALT_LENGTH};
