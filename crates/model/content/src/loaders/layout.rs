//! Control-model layout loader.
//!
//! A layout RON file lists control files in load order, parents first. Each
//! file holds its lines in order: comments, unrecognized text, file references
//! (several paths form a piped chain), variables and `IF SCENARIO` groups with
//! their nested bodies. Identifiers are derived from the file name and line
//! number so that reloading the same layout yields the same identifiers.
//!
//! Optional fields may be written bare (`root: "runs"`) or as `Some(..)`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use model_core::{BranchKind, ControlModel, EntryTag, Ident, ModelFileBuilder, PartRegistry};
use ron::extensions::Extensions;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::loaders::{LoadResult, read_file};
use crate::parts::{FileReference, ModelVariable};

/// Layout structure for RON files.
#[derive(Debug, Clone, Deserialize)]
struct LayoutRon {
    /// Model root, relative to the layout file.
    #[serde(default)]
    root: Option<PathBuf>,
    files: Vec<ControlFileRon>,
}

#[derive(Debug, Clone, Deserialize)]
struct ControlFileRon {
    name: String,
    #[serde(default)]
    category: Option<String>,
    /// Name of the control file that references this one.
    #[serde(default)]
    parent: Option<String>,
    /// Directory of this control file, relative to the model root.
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default)]
    lines: Vec<LineRon>,
}

#[derive(Debug, Clone, Deserialize)]
enum LineRon {
    Comment(String),
    Unknown(String),
    File {
        command: String,
        #[serde(default = "default_file_tag")]
        tag: EntryTag,
        paths: Vec<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        comment: Option<String>,
    },
    Variable {
        command: String,
        value: String,
        #[serde(default)]
        comment: Option<String>,
    },
    If {
        values: Vec<String>,
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        body: Vec<LineRon>,
        #[serde(default)]
        else_ifs: Vec<BranchRon>,
        #[serde(default)]
        else_branch: Option<BranchRon>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct BranchRon {
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    body: Vec<LineRon>,
}

fn default_file_tag() -> EntryTag {
    EntryTag::UnknownFile
}

/// Derives a stable identifier from a control file name, a line number and
/// the position of a path within a piped line.
///
/// Line 0 identifies the control file itself.
pub fn derive_ident(file_name: &str, line: u32, position: u32) -> Ident {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(line.to_le_bytes());
    hasher.update(position.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    Ident(u64::from_be_bytes(bytes))
}

/// Loader for control-model layouts from RON files.
pub struct LayoutLoader;

impl LayoutLoader {
    /// Load a layout file. Relative roots resolve against the layout's own
    /// directory.
    pub fn load(path: &Path) -> LoadResult<ControlModel> {
        let content = read_file(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base)
            .with_context(|| format!("Failed to load layout {}", path.display()))
    }

    /// Parse layout text, resolving the model root against `base`.
    pub fn parse(content: &str, base: &Path) -> LoadResult<ControlModel> {
        let layout: LayoutRon = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| anyhow!("Failed to parse layout RON: {}", e))?;
        let root = match layout.root {
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };

        let mut model = ControlModel::new();
        let mut declared: HashMap<String, Ident> = HashMap::new();

        for file in layout.files {
            if declared.contains_key(&file.name) {
                bail!("Control file '{}' is declared twice", file.name);
            }
            let ident = derive_ident(&file.name, 0, 0);
            let category = file
                .category
                .clone()
                .unwrap_or_else(|| extension_of(&file.name));
            let dir = match &file.directory {
                Some(dir) => root.join(dir),
                None => root.clone(),
            };

            let mut builder = ModelFileBuilder::new(file.name.as_str(), category, ident);
            if let Some(parent) = &file.parent {
                let parent = declared.get(parent).ok_or_else(|| {
                    anyhow!(
                        "Parent '{}' of '{}' must be declared before it",
                        parent,
                        file.name
                    )
                })?;
                builder = builder.with_parent(*parent);
            }

            let mut reader = FileReader {
                name: &file.name,
                dir: &dir,
                line: 0,
                parts: model.parts_mut(),
                builder,
            };
            reader.lines(file.lines)?;
            let built = reader
                .builder
                .build()
                .with_context(|| format!("Control file '{}' is malformed", file.name))?;

            declared.insert(file.name.clone(), ident);
            model.add_file(built);
        }

        tracing::info!(
            "Loaded {} control files with {} parts",
            model.files().len(),
            model.parts().len()
        );
        Ok(model)
    }
}

fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Drives a [`ModelFileBuilder`] through the lines of one control file.
struct FileReader<'a> {
    name: &'a str,
    dir: &'a Path,
    line: u32,
    parts: &'a mut PartRegistry,
    builder: ModelFileBuilder,
}

impl FileReader<'_> {
    fn next_line(&mut self) -> u32 {
        self.line += 1;
        self.line
    }

    fn lines(&mut self, lines: Vec<LineRon>) -> LoadResult<()> {
        for line in lines {
            self.read(line)?;
        }
        Ok(())
    }

    fn read(&mut self, line: LineRon) -> LoadResult<()> {
        let number = self.next_line();
        match line {
            LineRon::Comment(text) => self.builder.comment(text),
            LineRon::Unknown(text) => {
                tracing::debug!("{} line {}: keeping unrecognized text", self.name, number);
                self.builder.unknown(text);
            }
            LineRon::Variable {
                command,
                value,
                comment,
            } => {
                let mut variable =
                    ModelVariable::new(derive_ident(self.name, number, 0), command, value);
                if let Some(comment) = comment {
                    variable = variable.with_comment(comment);
                }
                let handle = self
                    .parts
                    .insert(variable)
                    .with_context(|| format!("{} line {}", self.name, number))?;
                self.builder.part(EntryTag::Variable, handle, self.parts)?;
            }
            LineRon::File {
                command,
                tag,
                paths,
                category,
                comment,
            } => self.file_line(number, command, tag, paths, category, comment)?,
            LineRon::If {
                values,
                comment,
                body,
                else_ifs,
                else_branch,
            } => {
                if values.is_empty() {
                    bail!("{} line {}: IF SCENARIO has no values", self.name, number);
                }
                let ident = derive_ident(self.name, number, 0);
                self.builder
                    .begin_branch(BranchKind::If, values, ident, comment)?;
                self.lines(body)?;

                for branch in else_ifs {
                    let line = self.next_line();
                    if branch.values.is_empty() {
                        bail!("{} line {}: ELSE IF SCENARIO has no values", self.name, line);
                    }
                    let ident = derive_ident(self.name, line, 0);
                    self.builder.begin_branch(
                        BranchKind::ElseIf,
                        branch.values,
                        ident,
                        branch.comment,
                    )?;
                    self.lines(branch.body)?;
                }
                if let Some(branch) = else_branch {
                    let ident = derive_ident(self.name, self.next_line(), 0);
                    self.builder
                        .begin_branch(BranchKind::Else, Vec::new(), ident, branch.comment)?;
                    self.lines(branch.body)?;
                }

                self.next_line();
                self.builder.end_if()?;
            }
        }
        Ok(())
    }

    /// One reference per path; each links to the next and the trailing
    /// comment goes on the last.
    fn file_line(
        &mut self,
        number: u32,
        command: String,
        tag: EntryTag,
        paths: Vec<String>,
        category: Option<String>,
        mut comment: Option<String>,
    ) -> LoadResult<()> {
        if paths.is_empty() {
            bail!("{} line {}: '{}' has no path", self.name, number, command);
        }
        let idents: Vec<Ident> = (0..paths.len())
            .map(|position| derive_ident(self.name, number, position as u32))
            .collect();
        let last = paths.len() - 1;

        for (position, path) in paths.iter().enumerate() {
            let mut part = if position == 0 {
                let head = FileReference::new(idents[0], command.as_str(), path, self.dir);
                match &category {
                    Some(category) => head.with_category(category.as_str()),
                    None => head,
                }
            } else {
                FileReference::continuation(idents[position], path, self.dir)
            };
            if let Some(&next) = idents.get(position + 1) {
                part = part.linked_to(next);
            }
            if position == last
                && let Some(comment) = comment.take()
            {
                part = part.with_comment(comment);
            }

            let handle = self
                .parts
                .insert(part)
                .with_context(|| format!("{} line {}", self.name, number))?;
            self.builder
                .part(tag, handle, self.parts)
                .with_context(|| format!("{} line {}: '{}'", self.name, number, path))?;
        }
        Ok(())
    }
}
