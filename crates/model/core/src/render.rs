//! Printable reconstruction of a control file.
//!
//! Walks the entry sequence once, keeping a stack of open scenario blocks and
//! the current indent. Comments and unrecognized lines are emitted verbatim;
//! scenario statements and parts are indented by the nesting depth. Piped
//! chains are followed through [`FilePart::linked_next`] and collapsed onto
//! the head's line; their continuation entries produce no line of their own.
use std::collections::HashSet;

use crate::config::RenderConfig;
use crate::entry::Entry;
use crate::error::{ControlError, ErrorSeverity};
use crate::model::ModelFile;
use crate::part::{FilePart, Ident, PartHandle, PartRegistry};
use crate::scenario::{BranchKind, ScenarioBlock};

/// Structural inconsistencies found while rendering.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("END IF at entry {position} has no open scenario block")]
    UnmatchedEnd { position: usize },

    #[error("scenario marker at entry {position} expects block #{slot}, which does not exist")]
    MissingScenarioBlock { position: usize, slot: usize },

    #[error("{kind:?} branch at entry {position} has no open IF to continue")]
    OrphanBranch { position: usize, kind: BranchKind },

    #[error("END IF at entry {position} closes block {ident}, which has no closing marker")]
    MissingClosingMarker { position: usize, ident: Ident },

    #[error("{depth} scenario block(s) still open at end of file")]
    UnclosedGroup { depth: usize },

    #[error("part {head} links to {missing}, which is not registered")]
    BrokenChain { head: Ident, missing: Ident },

    #[error("piped chain through {0} loops back on itself")]
    ChainCycle(Ident),

    #[error("entry {position} refers to unregistered part {handle}")]
    UnknownHandle { position: usize, handle: PartHandle },
}

impl ControlError for RenderError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BrokenChain { .. } | Self::ChainCycle(_) | Self::UnknownHandle { .. } => {
                ErrorSeverity::Internal
            }
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnmatchedEnd { .. } => "RENDER_UNMATCHED_END",
            Self::MissingScenarioBlock { .. } => "RENDER_MISSING_SCENARIO_BLOCK",
            Self::OrphanBranch { .. } => "RENDER_ORPHAN_BRANCH",
            Self::MissingClosingMarker { .. } => "RENDER_MISSING_CLOSING_MARKER",
            Self::UnclosedGroup { .. } => "RENDER_UNCLOSED_GROUP",
            Self::BrokenChain { .. } => "RENDER_BROKEN_CHAIN",
            Self::ChainCycle(_) => "RENDER_CHAIN_CYCLE",
            Self::UnknownHandle { .. } => "RENDER_UNKNOWN_HANDLE",
        }
    }
}

impl ModelFile {
    /// Reconstructs the file as a list of lines, without line terminators.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if scenario markers and blocks do not nest,
    /// or if a piped chain cannot be resolved.
    pub fn printable_contents(
        &self,
        parts: &PartRegistry,
        config: &RenderConfig,
    ) -> Result<Vec<String>, RenderError> {
        Renderer::new(self, parts, config).render()
    }

    /// Reconstructs the file as text, terminating each line with the
    /// configured line ending.
    pub fn render_text(
        &self,
        parts: &PartRegistry,
        config: &RenderConfig,
    ) -> Result<String, RenderError> {
        let lines = self.printable_contents(parts, config)?;
        let mut text = String::new();
        for line in lines {
            text.push_str(&line);
            text.push_str(&config.line_ending);
        }
        Ok(text)
    }
}

struct Renderer<'a> {
    file: &'a ModelFile,
    parts: &'a PartRegistry,
    config: &'a RenderConfig,
    /// Blocks in ordinal order; the `n`th marker opens `queue[n]`.
    queue: Vec<&'a ScenarioBlock>,
    open: Vec<&'a ScenarioBlock>,
    output: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn new(file: &'a ModelFile, parts: &'a PartRegistry, config: &'a RenderConfig) -> Self {
        let mut queue: Vec<&ScenarioBlock> = file.scenarios.iter().collect();
        queue.sort_by_key(|block| block.ordinal());
        Self {
            file,
            parts,
            config,
            queue,
            open: Vec::new(),
            output: Vec::with_capacity(file.entries.len()),
        }
    }

    fn indent(&self) -> String {
        " ".repeat(self.open.len() * self.config.indent_width)
    }

    fn render(mut self) -> Result<Vec<String>, RenderError> {
        let continuations = self.continuations()?;
        let file = self.file;

        for (position, entry) in file.entries.iter().enumerate() {
            match entry {
                Entry::Comment(text) | Entry::Unknown(text) => self.output.push(text.clone()),
                Entry::ScenarioOpen(slot) => self.open_block(position, *slot)?,
                Entry::ScenarioClose => self.close_group(position)?,
                Entry::Part { handle, .. } => {
                    if continuations.contains(handle) {
                        continue;
                    }
                    let part = self
                        .parts
                        .get(*handle)
                        .ok_or(RenderError::UnknownHandle {
                            position,
                            handle: *handle,
                        })?;
                    let line = self.part_line(part)?;
                    let indent = self.indent();
                    self.output.push(indent + &line);
                }
            }
        }

        if !self.open.is_empty() {
            return Err(RenderError::UnclosedGroup {
                depth: self.open.len(),
            });
        }
        Ok(self.output)
    }

    fn open_block(&mut self, position: usize, slot: usize) -> Result<(), RenderError> {
        let block = *self
            .queue
            .get(slot)
            .ok_or(RenderError::MissingScenarioBlock { position, slot })?;

        if block.branch() != BranchKind::If {
            // ELSE IF / ELSE replaces the previous branch of the same group
            match self.open.last() {
                Some(previous) if !previous.has_closing_marker() => {
                    self.open.pop();
                }
                _ => {
                    return Err(RenderError::OrphanBranch {
                        position,
                        kind: block.branch(),
                    });
                }
            }
        }

        let mut line = self.indent() + &block.opening_statement();
        if let Some(comment) = block.comment() {
            line.push_str(" ! ");
            line.push_str(comment);
        }
        tracing::trace!("Opening scenario {} at depth {}", block.ident(), self.open.len());
        self.output.push(line);
        self.open.push(block);
        Ok(())
    }

    fn close_group(&mut self, position: usize) -> Result<(), RenderError> {
        let block = self
            .open
            .pop()
            .ok_or(RenderError::UnmatchedEnd { position })?;
        if !block.has_closing_marker() {
            return Err(RenderError::MissingClosingMarker {
                position,
                ident: block.ident(),
            });
        }
        let line = self.indent() + block.closing_statement();
        self.output.push(line);
        Ok(())
    }

    fn part_line(&self, part: &dyn FilePart) -> Result<String, RenderError> {
        if self.config.is_auto_category(part.category()) {
            return Ok(match part.comment() {
                Some(comment) => format!("{} Auto ! {}", part.command(), comment),
                None => format!("{} Auto !", part.command()),
            });
        }
        if part.linked_next().is_none() {
            return Ok(part.printable());
        }

        let mut members = vec![part.printable()];
        let mut next = part.linked_next();
        while let Some(ident) = next {
            let link = self.parts.resolve(ident).ok_or(RenderError::BrokenChain {
                head: part.id(),
                missing: ident,
            })?;
            members.push(link.printable());
            next = link.linked_next();
        }
        Ok(members.join(" | "))
    }

    /// Handles of every part reached through another part's chain link.
    ///
    /// Also rejects cycles, which would otherwise swallow every member.
    fn continuations(&self) -> Result<HashSet<PartHandle>, RenderError> {
        let mut linked = HashSet::new();
        for entry in &self.file.entries {
            let Some(part) = entry.part().and_then(|h| self.parts.get(h)) else {
                continue;
            };
            let mut seen = HashSet::from([part.id()]);
            let mut next = part.linked_next();
            while let Some(ident) = next {
                if !seen.insert(ident) {
                    return Err(RenderError::ChainCycle(ident));
                }
                let handle = self.parts.handle_of(ident).ok_or(RenderError::BrokenChain {
                    head: part.id(),
                    missing: ident,
                })?;
                if !linked.insert(handle) {
                    // already walked from an earlier head
                    break;
                }
                next = self.parts.get(handle).and_then(|p| p.linked_next());
            }
        }
        Ok(linked)
    }
}
