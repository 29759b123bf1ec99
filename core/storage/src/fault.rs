//! Failure injection for exercising rollback paths.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::provider::{FileSystem, FsOp};
use sealbox_common::Result;

/// Wraps a [`FileSystem`] and fails chosen calls.
///
/// Each rule names an operation and the 1-based call number that should
/// fail, e.g. `fail_on(FsOp::Rename, 2)` lets the first rename through and
/// fails the second. Failing calls have no effect on the inner file system.
pub struct FailingFileSystem<F> {
    inner: F,
    rules: HashMap<FsOp, Vec<usize>>,
    calls: Mutex<HashMap<FsOp, usize>>,
}

impl<F: FileSystem> FailingFileSystem<F> {
    /// Wrap a file system with no failure rules.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            rules: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Fail the `nth` call (1-based) of `op`.
    pub fn fail_on(mut self, op: FsOp, nth: usize) -> Self {
        self.rules.entry(op).or_default().push(nth);
        self
    }

    /// Access the wrapped file system.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Number of times `op` has been called so far.
    pub fn calls(&self, op: FsOp) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    fn check(&self, op: FsOp, path: &Path) -> Result<()> {
        let call = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            let count = calls.entry(op).or_insert(0);
            *count += 1;
            *count
        };

        let fails = self
            .rules
            .get(&op)
            .is_some_and(|calls| calls.contains(&call));
        if fails {
            return Err(io::Error::other(format!(
                "injected {} failure (call {}) on {}",
                op,
                call,
                path.display()
            ))
            .into());
        }
        Ok(())
    }
}

impl<F: FileSystem> FileSystem for FailingFileSystem<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.check(FsOp::Read, path)?;
        self.inner.read_to_string(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.check(FsOp::Rename, from)?;
        self.inner.rename(from, to)
    }

    fn create_empty(&self, path: &Path) -> Result<()> {
        self.check(FsOp::CreateEmpty, path)?;
        self.inner.create_empty(path)
    }

    fn append_text(&self, path: &Path, text: &str) -> Result<()> {
        self.check(FsOp::Append, path)?;
        self.inner.append_text(path, text)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        self.check(FsOp::Delete, path)?;
        self.inner.delete(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFileSystem;
    use sealbox_common::Error;

    #[test]
    fn test_fails_only_selected_call() {
        let mem = MemoryFileSystem::new();
        mem.insert("/a", "1");
        mem.insert("/b", "2");
        let fs = FailingFileSystem::new(mem).fail_on(FsOp::Rename, 2);

        fs.rename(Path::new("/a"), Path::new("/a2")).unwrap();
        let second = fs.rename(Path::new("/b"), Path::new("/b2"));

        assert!(matches!(second, Err(Error::Io(_))));
        assert_eq!(fs.calls(FsOp::Rename), 2);
        // The failed rename must not have touched anything.
        assert_eq!(fs.inner().get(Path::new("/b")).as_deref(), Some("2"));
    }

    #[test]
    fn test_passthrough_without_rules() {
        let fs = FailingFileSystem::new(MemoryFileSystem::new());
        fs.append_text(Path::new("/f"), "x").unwrap();

        assert_eq!(fs.read_to_string(Path::new("/f")).unwrap(), "x");
        assert_eq!(fs.name(), "memory");
    }
}
