//! Common utilities and types shared across SealBox modules.
//!
//! This module provides the error taxonomy used by every layer and the
//! passphrase wrapper handed from callers down to key derivation.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::Passphrase;
