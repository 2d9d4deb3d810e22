//! Capabilities of externally owned file parts and the arena that holds them.
//!
//! A file part is a recognized unit of a control-file line: a file reference,
//! a variable assignment, and so on. The concrete types live outside this
//! crate; the model only relies on the [`FilePart`] and [`FileSource`]
//! capabilities and addresses parts through [`PartHandle`]s into a
//! [`PartRegistry`].
mod registry;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use registry::{PartRegistry, RegistryError};

/// Stable identifier of a file part or scenario block.
///
/// Displayed as 16 lowercase hex digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident(pub u64);

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{0}': expected up to 16 hex digits")]
pub struct IdentParseError(pub String);

impl FromStr for Ident {
    type Err = IdentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 16 {
            return Err(IdentParseError(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Ident)
            .map_err(|_| IdentParseError(s.to_string()))
    }
}

/// Index of a part inside a [`PartRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartHandle(pub u32);

impl PartHandle {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A recognized unit of a control-file line.
pub trait FilePart: Send + Sync + fmt::Debug {
    /// Stable identifier, unique within one control model.
    fn id(&self) -> Ident;

    /// Category tag of the part, e.g. `tgc`, `ecf`, `gis`, `variable`.
    fn category(&self) -> &str;

    /// The command text on the left of `==`.
    fn command(&self) -> &str;

    /// Trailing comment, without the comment character.
    fn comment(&self) -> Option<&str> {
        None
    }

    /// The line text this part renders to.
    fn printable(&self) -> String;

    /// Identifier of the next part in a piped chain.
    fn linked_next(&self) -> Option<Ident> {
        None
    }

    /// Path capabilities, for parts that reference files.
    fn as_file(&self) -> Option<&dyn FileSource> {
        None
    }
}

/// Path resolution for file-bearing parts.
///
/// The `all_types` variants expand multi-file formats (e.g. a shapefile and
/// its `.shx`/`.dbf` companions) into one entry per file.
pub trait FileSource {
    /// File name without extension.
    fn file_name(&self) -> &str;

    /// Extension without the leading dot.
    fn extension(&self) -> &str;

    fn file_name_and_extension(&self) -> String {
        format!("{}.{}", self.file_name(), self.extension())
    }

    fn file_name_and_extension_all_types(&self) -> Vec<String> {
        vec![self.file_name_and_extension()]
    }

    fn absolute_paths(&self, all_types: bool) -> Vec<PathBuf>;

    fn relative_paths(&self, all_types: bool) -> Vec<PathBuf>;
}
