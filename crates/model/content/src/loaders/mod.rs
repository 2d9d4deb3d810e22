//! Loaders that turn RON/TOML files into a [`model_core::ControlModel`] and
//! its render configuration.

pub mod config;
pub mod layout;

pub use config::ConfigLoader;
pub use layout::{LayoutLoader, derive_ident};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
