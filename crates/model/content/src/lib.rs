//! Concrete file parts and data-driven loaders for control models.
//!
//! This crate provides the pieces `model-core` leaves to its callers:
//! - File references and variables implementing [`model_core::FilePart`]
//! - A RON layout loader that drives the model's load phase
//! - A TOML loader for [`model_core::RenderConfig`]
//! - A filesystem-backed [`model_core::ExistenceOracle`]

pub mod oracle;
pub mod parts;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use oracle::FileSystemOracle;
pub use parts::{FileReference, ModelVariable, VARIABLE_CATEGORY, companion_extensions};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LayoutLoader, LoadResult, derive_ident};
