//! Read-only projections over a [`ModelFile`]'s entries.
//!
//! Every query walks the entry sequence in file order, so results keep the
//! order the lines had in the control file.
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::entry::{Entry, EntryTag};
use crate::env::ExistenceOracle;
use crate::error::{ControlError, ErrorSeverity};
use crate::model::ModelFile;
use crate::part::{FilePart, Ident, PartHandle, PartRegistry};
use crate::scenario::ELSE_SENTINEL;

/// Filter applied by [`ModelFile::get_files`].
///
/// The default applies no filtering and includes result files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileQuery {
    pub tag: Option<EntryTag>,
    pub extensions: Vec<String>,
    pub include_results: bool,
}

impl FileQuery {
    pub fn new() -> Self {
        Self {
            tag: None,
            extensions: Vec::new(),
            include_results: true,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: EntryTag) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn without_results(mut self) -> Self {
        self.include_results = false;
        self
    }

    fn accepts(&self, tag: EntryTag, extension: &str) -> bool {
        if self.tag.is_some_and(|wanted| wanted != tag) {
            return false;
        }
        if !self.include_results && tag == EntryTag::Result {
            return false;
        }
        self.extensions.is_empty() || self.extensions.iter().any(|e| e == extension)
    }
}

impl Default for FileQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// How [`ModelFile::get_file_names`] spells each name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameStyle {
    pub with_extension: bool,
    /// Expand multi-file formats into one name per companion file.
    pub all_types: bool,
}

impl Default for NameStyle {
    fn default() -> Self {
        Self {
            with_extension: true,
            all_types: false,
        }
    }
}

/// A file reference whose resolved path does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissingFile {
    /// File name with extension.
    pub name: String,
    /// Lexically normalized absolute path.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no entry found with identifier {0}")]
    NotFound(Ident),

    #[error("identifier {ident} is carried by entries {first} and {second}")]
    DuplicateIdent {
        ident: Ident,
        first: PartHandle,
        second: PartHandle,
    },
}

impl ControlError for LookupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound(_) => ErrorSeverity::Recoverable,
            Self::DuplicateIdent { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "LOOKUP_NOT_FOUND",
            Self::DuplicateIdent { .. } => "LOOKUP_DUPLICATE_IDENT",
        }
    }
}

impl ModelFile {
    /// Part entries in file order, skipping handles the registry does not know.
    fn part_entries<'a>(
        &'a self,
        parts: &'a PartRegistry,
    ) -> impl Iterator<Item = (EntryTag, PartHandle, &'a dyn FilePart)> + 'a {
        self.entries.iter().filter_map(move |entry| match entry {
            Entry::Part { tag, handle } => match parts.get(*handle) {
                Some(part) => Some((*tag, *handle, part)),
                None => {
                    tracing::debug!("Entry refers to unregistered part {}", handle);
                    None
                }
            },
            _ => None,
        })
    }

    /// File-bearing parts accepted by `query`, in file order.
    pub fn get_files<'a>(
        &'a self,
        parts: &'a PartRegistry,
        query: &FileQuery,
    ) -> Vec<&'a dyn FilePart> {
        self.part_entries(parts)
            .filter(|(tag, _, part)| {
                part.as_file()
                    .is_some_and(|file| query.accepts(*tag, file.extension()))
            })
            .map(|(_, _, part)| part)
            .collect()
    }

    pub fn get_file_names(
        &self,
        parts: &PartRegistry,
        query: &FileQuery,
        style: NameStyle,
    ) -> Vec<String> {
        self.get_files(parts, query)
            .into_iter()
            .filter_map(|part| part.as_file())
            .flat_map(|file| {
                if !style.with_extension {
                    vec![file.file_name().to_string()]
                } else if style.all_types {
                    file.file_name_and_extension_all_types()
                } else {
                    vec![file.file_name_and_extension()]
                }
            })
            .collect()
    }

    pub fn get_absolute_paths(
        &self,
        parts: &PartRegistry,
        query: &FileQuery,
        all_types: bool,
    ) -> Vec<PathBuf> {
        self.get_files(parts, query)
            .into_iter()
            .filter_map(|part| part.as_file())
            .flat_map(|file| file.absolute_paths(all_types))
            .collect()
    }

    pub fn get_relative_paths(
        &self,
        parts: &PartRegistry,
        query: &FileQuery,
        all_types: bool,
    ) -> Vec<PathBuf> {
        self.get_files(parts, query)
            .into_iter()
            .filter_map(|part| part.as_file())
            .flat_map(|file| file.relative_paths(all_types))
            .collect()
    }

    /// Every entry tagged [`EntryTag::Variable`], in file order.
    pub fn get_variables<'a>(&'a self, parts: &'a PartRegistry) -> Vec<&'a dyn FilePart> {
        self.part_entries(parts)
            .filter(|(tag, _, _)| *tag == EntryTag::Variable)
            .map(|(_, _, part)| part)
            .collect()
    }

    /// Checks every non-result file reference against `oracle`.
    ///
    /// Never fails; missing files are returned in file order.
    pub fn test_exists(
        &self,
        parts: &PartRegistry,
        oracle: &dyn ExistenceOracle,
    ) -> Vec<MissingFile> {
        let mut missing = Vec::new();
        for (tag, _, part) in self.part_entries(parts) {
            if tag == EntryTag::Result {
                continue;
            }
            let Some(file) = part.as_file() else {
                continue;
            };
            for path in file.absolute_paths(false) {
                if !oracle.exists(&path) {
                    tracing::debug!(
                        "Missing file {} ({})",
                        file.file_name_and_extension(),
                        path.display()
                    );
                    missing.push(MissingFile {
                        name: file.file_name_and_extension(),
                        path: normalize_path(&path),
                    });
                }
            }
        }
        missing
    }

    /// Finds the entry carrying `ident`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::NotFound` if no entry carries the identifier and
    /// `LookupError::DuplicateIdent` if more than one does.
    pub fn get_entry_by_id(
        &self,
        parts: &PartRegistry,
        ident: Ident,
    ) -> Result<PartHandle, LookupError> {
        let mut found = None;
        for (_, handle, part) in self.part_entries(parts) {
            if part.id() != ident {
                continue;
            }
            if let Some(first) = found {
                return Err(LookupError::DuplicateIdent {
                    ident,
                    first,
                    second: handle,
                });
            }
            found = Some(handle);
        }
        found.ok_or(LookupError::NotFound(ident))
    }

    /// Every distinct scenario value, first-seen order, without `ELSE`.
    pub fn get_scenario_variables(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.scenarios
            .iter()
            .flat_map(|block| block.values())
            .map(String::as_str)
            .filter(|value| *value != ELSE_SENTINEL && seen.insert(*value))
            .collect()
    }

    /// Parts directly inside any branch whose values intersect `selected`,
    /// in file order.
    pub fn get_contents_by_scenario<'a, S: AsRef<str>>(
        &'a self,
        parts: &'a PartRegistry,
        selected: &[S],
    ) -> Vec<&'a dyn FilePart> {
        let wanted: HashSet<Ident> = self
            .scenarios
            .iter()
            .filter(|block| block.matches_any(selected))
            .flat_map(|block| block.file_part_refs())
            .collect();

        self.part_entries(parts)
            .filter(|(_, _, part)| wanted.contains(&part.id()))
            .map(|(_, _, part)| part)
            .collect()
    }
}

/// Lexically normalizes a path: drops `.` and folds `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Payload;
    use crate::model::ModelFileBuilder;
    use crate::scenario::{BranchKind, RefKind, ScenarioBlock};
    use crate::testing::StubPart;

    fn vals(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    /// ```text
    /// ! header
    /// Read GIS == zpts.shp
    /// Timestep == 2
    /// IF SCENARIO == DEV | TEST
    ///     Read GIS == dev.shp
    /// ELSE IF SCENARIO == OPT
    ///     Read Materials == mat.csv
    /// ELSE
    ///     Read GIS == base.mif
    /// END IF
    /// Output Folder == results.tmp
    /// ```
    fn sample() -> (PartRegistry, ModelFile) {
        let mut parts = PartRegistry::new();
        let zpts = parts.insert(StubPart::file(1, "zpts", "shp")).unwrap();
        let step = parts.insert(StubPart::new(2, "Timestep == 2")).unwrap();
        let dev = parts.insert(StubPart::file(3, "dev", "shp")).unwrap();
        let mat = parts.insert(StubPart::file(4, "mat", "csv")).unwrap();
        let base = parts
            .insert(StubPart::file(5, "base", "mif").with_companions(&["mid"]))
            .unwrap();
        let out = parts.insert(StubPart::file(6, "results", "tmp")).unwrap();

        let mut b = ModelFileBuilder::new("model.tgc", "tgc", Ident(900));
        b.comment("! header");
        b.part(EntryTag::Gis, zpts, &parts).unwrap();
        b.part(EntryTag::Variable, step, &parts).unwrap();
        b.begin_if(vals(&["DEV", "TEST"]), Ident(100)).unwrap();
        b.part(EntryTag::Gis, dev, &parts).unwrap();
        b.begin_else_if(vals(&["OPT", "DEV"]), Ident(101)).unwrap();
        b.part(EntryTag::Data, mat, &parts).unwrap();
        b.begin_else(Ident(102)).unwrap();
        b.part(EntryTag::Gis, base, &parts).unwrap();
        b.end_if().unwrap();
        b.part(EntryTag::Result, out, &parts).unwrap();
        (parts, b.build().unwrap())
    }

    fn names(parts: &[&dyn FilePart]) -> Vec<String> {
        parts.iter().map(|p| p.printable()).collect()
    }

    #[test]
    fn get_files_without_filters_returns_every_file_in_order() {
        let (parts, file) = sample();
        let files = file.get_files(&parts, &FileQuery::default());
        assert_eq!(
            names(&files),
            vec!["zpts.shp", "dev.shp", "mat.csv", "base.mif", "results.tmp"]
        );
    }

    #[test]
    fn get_files_filters_by_tag_extension_and_results() {
        let (parts, file) = sample();

        let gis = file.get_files(&parts, &FileQuery::new().with_tag(EntryTag::Gis));
        assert_eq!(names(&gis), vec!["zpts.shp", "dev.shp", "base.mif"]);

        let shp = file.get_files(&parts, &FileQuery::new().with_extensions(["shp"]));
        assert_eq!(names(&shp), vec!["zpts.shp", "dev.shp"]);

        let no_results = file.get_files(&parts, &FileQuery::new().without_results());
        assert_eq!(no_results.len(), 4);
        assert!(names(&no_results).iter().all(|n| n != "results.tmp"));
    }

    #[test]
    fn name_and_path_projections() {
        let (parts, file) = sample();
        let query = FileQuery::new().with_extensions(["mif"]);

        let plain = file.get_file_names(&parts, &query, NameStyle::default());
        assert_eq!(plain, vec!["base.mif"]);

        let bare = NameStyle {
            with_extension: false,
            all_types: false,
        };
        assert_eq!(file.get_file_names(&parts, &query, bare), vec!["base"]);

        let all = NameStyle {
            with_extension: true,
            all_types: true,
        };
        assert_eq!(
            file.get_file_names(&parts, &query, all),
            vec!["base.mif", "base.mid"]
        );

        assert_eq!(
            file.get_absolute_paths(&parts, &query, true),
            vec![
                PathBuf::from("/model/runs/../base.mif"),
                PathBuf::from("/model/runs/../base.mid")
            ]
        );
        assert_eq!(
            file.get_relative_paths(&parts, &query, false),
            vec![PathBuf::from("../base.mif")]
        );
    }

    #[test]
    fn variables_are_entries_tagged_variable() {
        let (parts, file) = sample();
        assert_eq!(names(&file.get_variables(&parts)), vec!["Timestep == 2"]);
    }

    #[test]
    fn test_exists_reports_normalized_missing_and_skips_results() {
        let (parts, file) = sample();
        let missing = file.test_exists(&parts, &|p: &Path| p.ends_with("zpts.shp"));

        let reported: Vec<_> = missing.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(reported, vec!["dev.shp", "mat.csv", "base.mif"]);
        assert_eq!(missing[0].path, PathBuf::from("/model/dev.shp"));

        let everything_missing = file.test_exists(&parts, &|_: &Path| false);
        assert!(everything_missing.iter().all(|m| m.name != "results.tmp"));
    }

    #[test]
    fn entry_lookup_by_ident() {
        let (parts, file) = sample();
        assert_eq!(file.get_entry_by_id(&parts, Ident(4)), Ok(PartHandle(3)));
        assert_eq!(
            file.get_entry_by_id(&parts, Ident(77)),
            Err(LookupError::NotFound(Ident(77)))
        );
    }

    #[test]
    fn entry_lookup_detects_collisions() {
        let mut parts = PartRegistry::new();
        let a = parts.insert(StubPart::new(1, "A")).unwrap();
        let mut b = ModelFileBuilder::new("a.tcf", "tcf", Ident(9));
        b.add_content(EntryTag::Variable, Payload::Part(a)).unwrap();
        b.add_content(EntryTag::Variable, Payload::Part(a)).unwrap();
        let file = b.build().unwrap();

        let err = file.get_entry_by_id(&parts, Ident(1)).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Internal);
    }

    #[test]
    fn scenario_variables_are_distinct_first_seen_without_else() {
        let (_, file) = sample();
        assert_eq!(file.get_scenario_variables(), vec!["DEV", "TEST", "OPT"]);
    }

    #[test]
    fn scenario_variables_drop_else_mixed_into_a_value_list() {
        let mut b = ModelFileBuilder::new("a.tcf", "tcf", Ident(9));
        b.begin_if(vals(&["A"]), Ident(10)).unwrap();
        b.begin_else_if(vals(&["B", "ELSE"]), Ident(11)).unwrap();
        b.end_if().unwrap();
        let file = b.build().unwrap();

        assert_eq!(file.get_scenario_variables(), vec!["A", "B"]);
    }

    #[test]
    fn contents_by_scenario_follow_file_order() {
        let (parts, file) = sample();

        let dev = file.get_contents_by_scenario(&parts, &["DEV"]);
        assert_eq!(names(&dev), vec!["dev.shp", "mat.csv"]);

        let opt = file.get_contents_by_scenario(&parts, &["OPT"]);
        assert_eq!(names(&opt), vec!["mat.csv"]);

        assert!(file.get_contents_by_scenario(&parts, &["NONE"]).is_empty());
    }

    #[test]
    fn contents_by_scenario_uses_direct_refs_only() {
        let mut parts = PartRegistry::new();
        let a = parts.insert(StubPart::new(1, "A")).unwrap();
        let b_part = parts.insert(StubPart::new(2, "B")).unwrap();

        let mut b = ModelFileBuilder::new("a.tcf", "tcf", Ident(9));
        b.add_content(EntryTag::Variable, Payload::Part(a)).unwrap();
        b.add_content(EntryTag::Variable, Payload::Part(b_part)).unwrap();
        let mut block = ScenarioBlock::new(0, BranchKind::If, vals(&["X"]), Ident(50));
        block.add_part_ref(RefKind::FilePart, Ident(2));
        block.add_part_ref(RefKind::Scenario, Ident(1));
        b.add_scenario(block);
        let file = b.build().unwrap();

        let selected = file.get_contents_by_scenario(&parts, &["X"]);
        assert_eq!(names(&selected), vec!["B"]);
    }

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./../c/file.shp")),
            PathBuf::from("/a/c/file.shp")
        );
        assert_eq!(normalize_path(Path::new("../x/../y")), PathBuf::from("../y"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }
}
