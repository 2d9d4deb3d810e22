//! Load-phase construction of a [`ModelFile`].
use crate::entry::{Entry, EntryError, EntryTag, Payload};
use crate::error::{ControlError, ErrorSeverity};
use crate::model::ModelFile;
use crate::part::{Ident, PartHandle, PartRegistry};
use crate::scenario::{BranchKind, RefKind, ScenarioBlock, ScenarioError, ScenarioHandle};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("{0} does not exist in this model file")]
    UnknownScenario(ScenarioHandle),

    #[error("part {0} is not registered")]
    UnknownPart(PartHandle),

    #[error("{kind:?} branch without an open IF")]
    OrphanBranch { kind: BranchKind },

    #[error("branch follows an ELSE in the same group")]
    BranchAfterElse,

    #[error("END IF without an open IF")]
    UnmatchedEnd,

    #[error("{depth} scenario group(s) left open")]
    UnclosedGroup { depth: usize },
}

impl ControlError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Entry(e) => e.severity(),
            Self::Scenario(e) => e.severity(),
            Self::UnknownScenario(_) | Self::UnknownPart(_) => ErrorSeverity::Internal,
            Self::OrphanBranch { .. }
            | Self::BranchAfterElse
            | Self::UnmatchedEnd
            | Self::UnclosedGroup { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Entry(e) => e.error_code(),
            Self::Scenario(e) => e.error_code(),
            Self::UnknownScenario(_) => "BUILD_UNKNOWN_SCENARIO",
            Self::UnknownPart(_) => "BUILD_UNKNOWN_PART",
            Self::OrphanBranch { .. } => "BUILD_ORPHAN_BRANCH",
            Self::BranchAfterElse => "BUILD_BRANCH_AFTER_ELSE",
            Self::UnmatchedEnd => "BUILD_UNMATCHED_END",
            Self::UnclosedGroup { .. } => "BUILD_UNCLOSED_GROUP",
        }
    }
}

/// Serialized load-phase API for one control file.
///
/// The low-level calls (`add_content`, `add_scenario`, `add_part_ref`,
/// `mark_closing`) store exactly what they are given. The high-level calls
/// (`part`, `begin_if`, `begin_else_if`, `begin_else`, `end_if`) also keep
/// ordinals, nesting references and closing markers consistent.
#[derive(Debug)]
pub struct ModelFileBuilder {
    file: ModelFile,
    open: Vec<ScenarioHandle>,
    opened_markers: usize,
    next_ordinal: u32,
}

impl ModelFileBuilder {
    pub fn new(name: impl Into<String>, category: impl Into<String>, ident: Ident) -> Self {
        Self {
            file: ModelFile {
                name: name.into(),
                category: category.into(),
                ident,
                parent: None,
                entries: Vec::new(),
                scenarios: Vec::new(),
            },
            open: Vec::new(),
            opened_markers: 0,
            next_ordinal: 0,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: Ident) -> Self {
        self.file.parent = Some(parent);
        self
    }

    /// Appends an entry. Only the payload shape is checked against the tag.
    pub fn add_content(&mut self, tag: EntryTag, payload: Payload) -> Result<(), BuildError> {
        let entry = Entry::from_tag(tag, payload, self.opened_markers)?;
        if matches!(entry, Entry::ScenarioOpen(_)) {
            self.opened_markers += 1;
        }
        self.file.entries.push(entry);
        Ok(())
    }

    pub fn add_scenario(&mut self, block: ScenarioBlock) -> ScenarioHandle {
        self.next_ordinal = self.next_ordinal.max(block.ordinal() + 1);
        self.file.scenarios.push(block);
        ScenarioHandle(self.file.scenarios.len() - 1)
    }

    pub fn add_part_ref(
        &mut self,
        handle: ScenarioHandle,
        kind: RefKind,
        ident: Ident,
    ) -> Result<(), BuildError> {
        self.scenario_mut(handle)?.add_part_ref(kind, ident);
        Ok(())
    }

    pub fn mark_closing(&mut self, handle: ScenarioHandle) -> Result<(), BuildError> {
        Ok(self.scenario_mut(handle)?.mark_closing()?)
    }

    pub fn scenario(&self, handle: ScenarioHandle) -> Option<&ScenarioBlock> {
        self.file.scenarios.get(handle.0)
    }

    fn scenario_mut(&mut self, handle: ScenarioHandle) -> Result<&mut ScenarioBlock, BuildError> {
        self.file
            .scenarios
            .get_mut(handle.0)
            .ok_or(BuildError::UnknownScenario(handle))
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.file.entries.push(Entry::Comment(text.into()));
    }

    pub fn unknown(&mut self, text: impl Into<String>) {
        self.file.entries.push(Entry::Unknown(text.into()));
    }

    /// Appends a part entry and records it on the innermost open branch.
    pub fn part(
        &mut self,
        tag: EntryTag,
        handle: PartHandle,
        parts: &PartRegistry,
    ) -> Result<(), BuildError> {
        let ident = parts.get(handle).ok_or(BuildError::UnknownPart(handle))?.id();
        self.add_content(tag, Payload::Part(handle))?;
        if let Some(&branch) = self.open.last() {
            self.add_part_ref(branch, RefKind::FilePart, ident)?;
        }
        Ok(())
    }

    pub fn begin_if(
        &mut self,
        values: Vec<String>,
        ident: Ident,
    ) -> Result<ScenarioHandle, BuildError> {
        self.begin_branch(BranchKind::If, values, ident, None)
    }

    pub fn begin_else_if(
        &mut self,
        values: Vec<String>,
        ident: Ident,
    ) -> Result<ScenarioHandle, BuildError> {
        self.begin_branch(BranchKind::ElseIf, values, ident, None)
    }

    pub fn begin_else(&mut self, ident: Ident) -> Result<ScenarioHandle, BuildError> {
        self.begin_branch(BranchKind::Else, Vec::new(), ident, None)
    }

    /// Opens a branch. `ElseIf` and `Else` replace the innermost open branch
    /// of the same group.
    pub fn begin_branch(
        &mut self,
        kind: BranchKind,
        values: Vec<String>,
        ident: Ident,
        comment: Option<String>,
    ) -> Result<ScenarioHandle, BuildError> {
        if kind != BranchKind::If {
            let previous = *self.open.last().ok_or(BuildError::OrphanBranch { kind })?;
            if self.scenario_mut(previous)?.branch() == BranchKind::Else {
                return Err(BuildError::BranchAfterElse);
            }
            self.open.pop();
        }

        let mut block = ScenarioBlock::new(self.next_ordinal, kind, values, ident);
        if let Some(comment) = comment {
            block = block.with_comment(comment);
        }
        if let Some(&parent) = self.open.last() {
            self.add_part_ref(parent, RefKind::Scenario, ident)?;
        }

        self.add_content(EntryTag::Scenario, Payload::None)?;
        let handle = self.add_scenario(block);
        self.open.push(handle);
        Ok(handle)
    }

    /// Closes the innermost group; its last branch receives the closing marker.
    pub fn end_if(&mut self) -> Result<(), BuildError> {
        let last = self.open.pop().ok_or(BuildError::UnmatchedEnd)?;
        self.mark_closing(last)?;
        self.add_content(EntryTag::ScenarioEnd, Payload::None)
    }

    /// Number of scenario groups currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Finishes the load phase.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::UnclosedGroup` if a group opened with
    /// [`begin_if`](Self::begin_if) was never closed.
    pub fn build(self) -> Result<ModelFile, BuildError> {
        if !self.open.is_empty() {
            return Err(BuildError::UnclosedGroup {
                depth: self.open.len(),
            });
        }
        Ok(self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubPart;

    fn vals(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn low_level_calls_store_in_order() {
        let mut builder = ModelFileBuilder::new("a.tcf", "tcf", Ident(1));
        builder
            .add_content(EntryTag::Comment, Payload::Text("! hi".into()))
            .unwrap();
        builder.add_content(EntryTag::Scenario, Payload::None).unwrap();
        builder.add_content(EntryTag::ScenarioEnd, Payload::None).unwrap();
        let block = ScenarioBlock::new(0, BranchKind::If, vals(&["1"]), Ident(9));
        let handle = builder.add_scenario(block);
        builder.mark_closing(handle).unwrap();

        let file = builder.build().unwrap();
        assert_eq!(
            file.entries(),
            [
                Entry::Comment("! hi".into()),
                Entry::ScenarioOpen(0),
                Entry::ScenarioClose
            ]
        );
        assert!(file.scenarios()[0].has_closing_marker());
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let mut builder = ModelFileBuilder::new("a.tcf", "tcf", Ident(1));
        let err = builder
            .add_content(EntryTag::Gis, Payload::Text("x".into()))
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTRY_PAYLOAD_MISMATCH");
    }

    #[test]
    fn high_level_group_records_refs_and_marker() {
        let mut parts = PartRegistry::new();
        let a = parts.insert(StubPart::new(10, "A")).unwrap();
        let b = parts.insert(StubPart::new(11, "B")).unwrap();
        let c = parts.insert(StubPart::new(12, "C")).unwrap();

        let mut builder = ModelFileBuilder::new("a.tcf", "tcf", Ident(1));
        let outer = builder.begin_if(vals(&["DEV"]), Ident(100)).unwrap();
        builder.part(EntryTag::Variable, a, &parts).unwrap();
        let inner = builder.begin_if(vals(&["FAST"]), Ident(101)).unwrap();
        builder.part(EntryTag::Variable, b, &parts).unwrap();
        builder.end_if().unwrap();
        let other = builder.begin_else(Ident(102)).unwrap();
        builder.part(EntryTag::Variable, c, &parts).unwrap();
        builder.end_if().unwrap();

        assert_eq!(builder.depth(), 0);
        let outer_block = builder.scenario(outer).unwrap();
        assert_eq!(outer_block.file_part_refs(), vec![Ident(10)]);
        assert_eq!(outer_block.nested_refs()[1].kind, RefKind::Scenario);
        assert!(!outer_block.has_closing_marker());

        assert!(builder.scenario(inner).unwrap().has_closing_marker());
        let else_block = builder.scenario(other).unwrap();
        assert!(else_block.has_closing_marker());
        assert_eq!(else_block.ordinal(), 2);
        assert_eq!(else_block.file_part_refs(), vec![Ident(12)]);

        let file = builder.build().unwrap();
        let slots: Vec<_> = file
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::ScenarioOpen(slot) => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn structural_misuse_is_reported() {
        let mut builder = ModelFileBuilder::new("a.tcf", "tcf", Ident(1));
        assert_eq!(
            builder.begin_else(Ident(2)),
            Err(BuildError::OrphanBranch {
                kind: BranchKind::Else
            })
        );
        assert_eq!(builder.end_if(), Err(BuildError::UnmatchedEnd));

        builder.begin_if(vals(&["A"]), Ident(3)).unwrap();
        builder.begin_else(Ident(4)).unwrap();
        assert_eq!(
            builder.begin_else_if(vals(&["B"]), Ident(5)),
            Err(BuildError::BranchAfterElse)
        );
        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::UnclosedGroup { depth: 1 }
        );
    }

    #[test]
    fn unregistered_part_is_rejected() {
        let parts = PartRegistry::new();
        let mut builder = ModelFileBuilder::new("a.tcf", "tcf", Ident(1));
        assert_eq!(
            builder.part(EntryTag::Gis, PartHandle(3), &parts),
            Err(BuildError::UnknownPart(PartHandle(3)))
        );
    }
}
