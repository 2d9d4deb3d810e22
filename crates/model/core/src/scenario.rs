//! Scenario blocks: one branch of an `IF SCENARIO ==` group.
//!
//! A group such as
//!
//! ```text
//! IF SCENARIO == DEV | TEST
//!     ...
//! ELSE IF SCENARIO == OPT
//!     ...
//! ELSE
//!     ...
//! END IF
//! ```
//!
//! is stored as three blocks (`If`, `ElseIf`, `Else`). Only the last one
//! carries the closing marker, matching the group's single `END IF` line.
use std::fmt;

use crate::error::{ControlError, ErrorSeverity};
use crate::part::Ident;

/// Value list marking an `ELSE` branch.
pub const ELSE_SENTINEL: &str = "ELSE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BranchKind {
    If,
    ElseIf,
    Else,
}

/// What a nested reference inside a branch points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefKind {
    FilePart,
    Scenario,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NestedRef {
    pub kind: RefKind,
    pub ident: Ident,
}

/// Position of a block in its model file's scenario list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScenarioHandle(pub usize);

impl fmt::Display for ScenarioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("scenario block {0} already has its closing marker")]
    ClosingMarkerAlreadySet(Ident),
}

impl ControlError for ScenarioError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ClosingMarkerAlreadySet(_) => "SCENARIO_CLOSING_MARKER_SET",
        }
    }
}

/// One branch of a conditional group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioBlock {
    ordinal: u32,
    branch: BranchKind,
    values: Vec<String>,
    ident: Ident,
    nested: Vec<NestedRef>,
    comment: Option<String>,
    has_closing_marker: bool,
    first_part: Option<Ident>,
}

impl ScenarioBlock {
    /// Creates a branch. `Else` branches always store the `["ELSE"]` sentinel.
    pub fn new(ordinal: u32, branch: BranchKind, values: Vec<String>, ident: Ident) -> Self {
        let values = match branch {
            BranchKind::Else => vec![ELSE_SENTINEL.to_string()],
            BranchKind::If | BranchKind::ElseIf => values,
        };
        Self {
            ordinal,
            branch,
            values,
            ident,
            nested: Vec::new(),
            comment: None,
            has_closing_marker: false,
            first_part: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn branch(&self) -> BranchKind {
        self.branch
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn ident(&self) -> Ident {
        self.ident
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn nested_refs(&self) -> &[NestedRef] {
        &self.nested
    }

    pub fn has_closing_marker(&self) -> bool {
        self.has_closing_marker
    }

    pub fn is_else(&self) -> bool {
        self.values.len() == 1 && self.values[0] == ELSE_SENTINEL
    }

    /// Records something this branch directly contains.
    pub fn add_part_ref(&mut self, kind: RefKind, ident: Ident) {
        self.nested.push(NestedRef { kind, ident });
        if kind == RefKind::FilePart && self.first_part.is_none() {
            self.first_part = Some(ident);
        }
    }

    pub fn first_part_ref(&self) -> Option<Ident> {
        self.first_part
    }

    /// Identifiers of the file parts directly inside this branch, in order.
    pub fn file_part_refs(&self) -> Vec<Ident> {
        self.nested
            .iter()
            .filter(|r| r.kind == RefKind::FilePart)
            .map(|r| r.ident)
            .collect()
    }

    /// Sets the closing marker. A group has exactly one, so this may only be
    /// called once per block.
    pub fn mark_closing(&mut self) -> Result<(), ScenarioError> {
        if self.has_closing_marker {
            return Err(ScenarioError::ClosingMarkerAlreadySet(self.ident));
        }
        self.has_closing_marker = true;
        Ok(())
    }

    /// Returns true if any of this branch's values is in `selected`.
    pub fn matches_any<S: AsRef<str>>(&self, selected: &[S]) -> bool {
        self.values
            .iter()
            .any(|v| selected.iter().any(|s| s.as_ref() == v))
    }

    /// `IF SCENARIO == A | B`, `ELSE IF SCENARIO == C` or `ELSE`.
    pub fn opening_statement(&self) -> String {
        if self.is_else() {
            return ELSE_SENTINEL.to_string();
        }
        let keyword = match self.branch {
            BranchKind::If => "IF SCENARIO ==",
            BranchKind::ElseIf | BranchKind::Else => "ELSE IF SCENARIO ==",
        };
        format!("{} {}", keyword, self.values.join(" | "))
    }

    /// `END IF` on the group's last branch, empty otherwise.
    pub fn closing_statement(&self) -> &'static str {
        if self.has_closing_marker { "END IF" } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn opening_statements_per_branch_kind() {
        let block = ScenarioBlock::new(0, BranchKind::If, values(&["DEV", "TEST"]), Ident(1));
        assert_eq!(block.opening_statement(), "IF SCENARIO == DEV | TEST");

        let block = ScenarioBlock::new(1, BranchKind::ElseIf, values(&["OPT"]), Ident(2));
        assert_eq!(block.opening_statement(), "ELSE IF SCENARIO == OPT");

        let block = ScenarioBlock::new(2, BranchKind::Else, Vec::new(), Ident(3));
        assert!(block.is_else());
        assert_eq!(block.values(), ["ELSE"]);
        assert_eq!(block.opening_statement(), "ELSE");
    }

    #[test]
    fn sentinel_values_render_as_else_for_any_kind() {
        let block = ScenarioBlock::new(0, BranchKind::ElseIf, values(&["ELSE"]), Ident(1));
        assert_eq!(block.opening_statement(), "ELSE");
    }

    #[test]
    fn closing_marker_is_set_exactly_once() {
        let mut block = ScenarioBlock::new(0, BranchKind::If, values(&["1"]), Ident(5));
        assert_eq!(block.closing_statement(), "");

        block.mark_closing().unwrap();
        assert_eq!(block.closing_statement(), "END IF");
        assert_eq!(
            block.mark_closing(),
            Err(ScenarioError::ClosingMarkerAlreadySet(Ident(5)))
        );
    }

    #[test]
    fn part_refs_keep_order_and_cache_first() {
        let mut block = ScenarioBlock::new(0, BranchKind::If, values(&["1"]), Ident(1));
        block.add_part_ref(RefKind::Scenario, Ident(10));
        block.add_part_ref(RefKind::FilePart, Ident(20));
        block.add_part_ref(RefKind::FilePart, Ident(30));

        assert_eq!(block.first_part_ref(), Some(Ident(20)));
        assert_eq!(block.file_part_refs(), vec![Ident(20), Ident(30)]);
        assert_eq!(block.nested_refs().len(), 3);
    }

    #[test]
    fn matches_any_intersects_values() {
        let block = ScenarioBlock::new(0, BranchKind::If, values(&["A", "B"]), Ident(1));
        assert!(block.matches_any(&["B"]));
        assert!(!block.matches_any(&["C", "D"]));
        assert!(!block.matches_any::<&str>(&[]));
    }
}
