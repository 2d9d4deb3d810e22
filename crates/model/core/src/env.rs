//! Traits describing read-only external data.
//!
//! The model never touches the filesystem itself. Existence checks go through
//! an [`ExistenceOracle`] supplied by the caller, so tests and tools can plug
//! in whatever view of the disk they have.
use std::path::Path;

/// Answers whether a resolved path exists.
pub trait ExistenceOracle: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

impl<F> ExistenceOracle for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}
