//! File access abstraction for SealBox.
//!
//! The transaction layer never touches `std::fs` directly; it goes through
//! the [`FileSystem`] trait so that the same protocol runs against the
//! local disk, an in-memory map, or a wrapper that injects failures.
//!
//! # Design Principles
//! - Synchronous: every call completes before returning
//! - Every failure is a distinguishable `Error::Io`
//! - No locking: single-writer access per path is the caller's job

pub mod fault;
pub mod local;
pub mod memory;
pub mod provider;

pub use fault::FailingFileSystem;
pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
pub use provider::{FileSystem, FsOp};
