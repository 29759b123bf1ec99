//! In-place file encryption for SealBox.
//!
//! This module provides:
//! - Encrypting and decrypting a file's contents in place
//! - Rename-based rollback when a step of the rewrite fails
//! - An opt-in write-temp-then-rename commit strategy
//! - Recovery of files left mid-transaction by a killed process
//!
//! # Architecture
//! The transaction layer sits between callers and the storage
//! abstraction, running the text engine from `sealbox-crypto` on the whole
//! file content in memory before any file is touched.
//!
//! # Concurrency
//! Transactions on the same path must not overlap. Nothing here locks;
//! callers provide single-writer access per path.

pub mod config;
pub mod transaction;

use std::path::Path;

use sealbox_common::{Passphrase, Result};
use sealbox_storage::LocalFileSystem;

pub use config::{CommitStrategy, SealConfig, ENC_SUFFIX, RAW_SUFFIX, TMP_SUFFIX};
pub use transaction::{side_path, Direction, FileTransaction, TransactionState};

/// Encrypt a file on local disk in place with the default configuration.
pub fn encrypt_file(path: impl AsRef<Path>, passphrase: &Passphrase) -> Result<()> {
    FileTransaction::new(LocalFileSystem::new()).encrypt_file(path.as_ref(), passphrase)
}

/// Decrypt a file on local disk in place with the default configuration.
pub fn decrypt_file(path: impl AsRef<Path>, passphrase: &Passphrase) -> Result<()> {
    FileTransaction::new(LocalFileSystem::new()).decrypt_file(path.as_ref(), passphrase)
}
