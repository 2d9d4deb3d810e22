//! Existence checks against the local filesystem.
use std::path::{Path, PathBuf};

use model_core::ExistenceOracle;

/// [`ExistenceOracle`] backed by `std::fs`.
///
/// Relative paths are resolved against `base` when one is set.
#[derive(Clone, Debug, Default)]
pub struct FileSystemOracle {
    base: Option<PathBuf>,
}

impl FileSystemOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl ExistenceOracle for FileSystemOracle {
    fn exists(&self, path: &Path) -> bool {
        match &self.base {
            Some(base) if path.is_relative() => base.join(path).exists(),
            _ => path.exists(),
        }
    }
}
