//! In-memory model of hydraulic control files.
//!
//! `model-core` holds the ordered entries of each control file, the
//! conditional scenario blocks that group them, and the queries and printable
//! reconstruction built on top. Concrete file parts (file references,
//! variables) are supplied by other crates through the [`FilePart`] and
//! [`FileSource`] capabilities; filesystem access goes through an
//! [`ExistenceOracle`]. Nothing here performs I/O.
pub mod config;
pub mod entry;
pub mod env;
pub mod error;
pub mod model;
pub mod part;
pub mod query;
pub mod render;
pub mod scenario;

#[cfg(test)]
mod testing;

pub use config::RenderConfig;
pub use entry::{Entry, EntryError, EntryTag, Payload};
pub use env::ExistenceOracle;
pub use error::{ControlError, ErrorSeverity, ModelError, Result};
pub use model::{BuildError, ControlModel, ModelFile, ModelFileBuilder};
pub use part::{
    FilePart, FileSource, Ident, IdentParseError, PartHandle, PartRegistry, RegistryError,
};
pub use query::{FileQuery, LookupError, MissingFile, NameStyle, normalize_path};
pub use render::RenderError;
pub use scenario::{
    BranchKind, ELSE_SENTINEL, NestedRef, RefKind, ScenarioBlock, ScenarioError, ScenarioHandle,
};
