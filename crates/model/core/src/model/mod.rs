//! Control files and the top-level model that owns their parts.
//!
//! A [`ModelFile`] keeps the exact line order of one control file (tcf, tgc,
//! ...) as a sequence of [`Entry`]s plus the scenario blocks referenced by its
//! markers. It is produced by [`ModelFileBuilder`] during the load phase and is
//! read-only afterwards. File parts live in the [`PartRegistry`] owned by
//! [`ControlModel`]; entries refer to them by [`crate::PartHandle`].
mod builder;

pub use builder::{BuildError, ModelFileBuilder};

use crate::config::RenderConfig;
use crate::entry::Entry;
use crate::env::ExistenceOracle;
use crate::error::{ModelError, Result};
use crate::part::{Ident, PartRegistry};
use crate::query::MissingFile;
use crate::scenario::ScenarioBlock;

/// One control file: ordered entries plus its scenario blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelFile {
    name: String,
    category: String,
    ident: Ident,
    parent: Option<Ident>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) scenarios: Vec<ScenarioBlock>,
}

impl ModelFile {
    /// File name as referenced by its parent, e.g. `model_01.tgc`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of control file, e.g. `tcf`, `tgc`, `ecf`.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn ident(&self) -> Ident {
        self.ident
    }

    /// Identifier of the control file that referenced this one.
    pub fn parent(&self) -> Option<Ident> {
        self.parent
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Scenario blocks in the order they were added.
    pub fn scenarios(&self) -> &[ScenarioBlock] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A loaded control model: every control file plus the arena of their parts.
#[derive(Debug, Default)]
pub struct ControlModel {
    parts: PartRegistry,
    files: Vec<ModelFile>,
}

impl ControlModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parts(&self) -> &PartRegistry {
        &self.parts
    }

    /// Mutable access to the arena, for the load phase only.
    pub fn parts_mut(&mut self) -> &mut PartRegistry {
        &mut self.parts
    }

    pub fn add_file(&mut self, file: ModelFile) {
        tracing::debug!(
            "Adding {} '{}' ({} entries, {} scenario blocks)",
            file.category,
            file.name,
            file.entries.len(),
            file.scenarios.len()
        );
        self.files.push(file);
    }

    pub fn files(&self) -> &[ModelFile] {
        &self.files
    }

    pub fn file(&self, ident: Ident) -> Option<&ModelFile> {
        self.files.iter().find(|f| f.ident == ident)
    }

    pub fn file_by_name(&self, name: &str) -> Option<&ModelFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn files_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ModelFile> + 'a {
        self.files
            .iter()
            .filter(move |f| f.category.eq_ignore_ascii_case(category))
    }

    /// Control files directly referenced by `parent`.
    pub fn children<'a>(&'a self, parent: Ident) -> impl Iterator<Item = &'a ModelFile> + 'a {
        self.files.iter().filter(move |f| f.parent == Some(parent))
    }

    /// Renders one control file.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownModelFile` for an unknown identifier and
    /// `ModelError::Render` if the file's structure is inconsistent.
    pub fn render(&self, ident: Ident, config: &RenderConfig) -> Result<Vec<String>> {
        let file = self.file(ident).ok_or(ModelError::UnknownModelFile(ident))?;
        Ok(file.printable_contents(&self.parts, config)?)
    }

    /// Runs [`ModelFile::test_exists`] over every control file, in order.
    pub fn test_exists(&self, oracle: &dyn ExistenceOracle) -> Vec<(Ident, MissingFile)> {
        self.files
            .iter()
            .flat_map(|f| {
                f.test_exists(&self.parts, oracle)
                    .into_iter()
                    .map(move |missing| (f.ident, missing))
            })
            .collect()
    }
}
