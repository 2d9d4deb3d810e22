//! Minimal part implementations for unit tests.
use std::path::{Path, PathBuf};

use crate::part::{FilePart, FileSource, Ident};

#[derive(Debug, Clone)]
pub(crate) struct StubFile {
    pub name: String,
    pub extension: String,
    pub root: PathBuf,
    pub companions: Vec<String>,
}

impl FileSource for StubFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn file_name_and_extension_all_types(&self) -> Vec<String> {
        std::iter::once(self.extension.as_str())
            .chain(self.companions.iter().map(String::as_str))
            .map(|ext| format!("{}.{}", self.name, ext))
            .collect()
    }

    fn absolute_paths(&self, all_types: bool) -> Vec<PathBuf> {
        self.relative_paths(all_types)
            .into_iter()
            .map(|p| self.root.join(p))
            .collect()
    }

    fn relative_paths(&self, all_types: bool) -> Vec<PathBuf> {
        let names = if all_types {
            self.file_name_and_extension_all_types()
        } else {
            vec![self.file_name_and_extension()]
        };
        names.into_iter().map(|n| Path::new("..").join(n)).collect()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StubPart {
    pub ident: Ident,
    pub text: String,
    pub category: String,
    pub command: String,
    pub comment: Option<String>,
    pub next: Option<Ident>,
    pub file: Option<StubFile>,
}

impl StubPart {
    pub fn new(ident: u64, text: &str) -> Self {
        Self {
            ident: Ident(ident),
            text: text.to_string(),
            category: "variable".to_string(),
            command: text.to_string(),
            comment: None,
            next: None,
            file: None,
        }
    }

    /// A file part named `<name>.<extension>` rooted at `/model/runs`.
    pub fn file(ident: u64, name: &str, extension: &str) -> Self {
        Self {
            category: extension.to_string(),
            file: Some(StubFile {
                name: name.to_string(),
                extension: extension.to_string(),
                root: PathBuf::from("/model/runs"),
                companions: Vec::new(),
            }),
            ..Self::new(ident, &format!("{name}.{extension}"))
        }
    }

    pub fn linked_to(mut self, next: u64) -> Self {
        self.next = Some(Ident(next));
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_command(mut self, command: &str, comment: Option<&str>) -> Self {
        self.command = command.to_string();
        self.comment = comment.map(str::to_string);
        self
    }

    pub fn with_companions(mut self, companions: &[&str]) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.companions = companions.iter().map(|c| c.to_string()).collect();
        }
        self
    }
}

impl FilePart for StubPart {
    fn id(&self) -> Ident {
        self.ident
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn command(&self) -> &str {
        &self.command
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn printable(&self) -> String {
        self.text.clone()
    }

    fn linked_next(&self) -> Option<Ident> {
        self.next
    }

    fn as_file(&self) -> Option<&dyn FileSource> {
        self.file.as_ref().map(|f| f as &dyn FileSource)
    }
}
