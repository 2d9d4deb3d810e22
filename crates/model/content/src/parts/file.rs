use std::path::PathBuf;

use model_core::{FilePart, FileSource, Ident, normalize_path};

/// Extensions that always travel with a primary file of `extension`.
///
/// Multi-file GIS formats are listed here; everything else is a single file.
pub fn companion_extensions(extension: &str) -> &'static [&'static str] {
    match extension.to_ascii_lowercase().as_str() {
        "shp" => &["shx", "dbf"],
        "mif" => &["mid"],
        "tab" => &["dat", "map", "id"],
        _ => &[],
    }
}

/// A command pointing at one file, e.g. `Read GIS Z Shape == ..\gis\zpts.shp`.
///
/// A piped line (`A | B | C`) becomes one reference per path. The first holds
/// the command; the rest are continuations with an empty command, reached
/// through [`FilePart::linked_next`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReference {
    ident: Ident,
    category: String,
    command: String,
    /// Path as written, with forward slashes.
    path: String,
    /// Directory of the control file the line was read from.
    base: PathBuf,
    comment: Option<String>,
    next: Option<Ident>,
}

impl FileReference {
    pub fn new(
        ident: Ident,
        command: impl Into<String>,
        path: &str,
        base: impl Into<PathBuf>,
    ) -> Self {
        let path = path.trim().replace('\\', "/");
        let mut reference = Self {
            ident,
            category: String::new(),
            command: command.into(),
            path,
            base: base.into(),
            comment: None,
            next: None,
        };
        reference.category = reference.extension().to_ascii_lowercase();
        reference
    }

    /// A non-head member of a piped chain.
    pub fn continuation(ident: Ident, path: &str, base: impl Into<PathBuf>) -> Self {
        Self::new(ident, "", path, base)
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn linked_to(mut self, next: Ident) -> Self {
        self.next = Some(next);
        self
    }

    /// The path as written in the control file.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn split(&self) -> (&str, &str, &str) {
        let (dir, file) = match self.path.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", self.path.as_str()),
        };
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (dir, stem, ext),
            _ => (dir, file, ""),
        }
    }

    fn extensions(&self, all_types: bool) -> Vec<&str> {
        let primary = self.extension();
        let mut extensions = vec![primary];
        if all_types {
            extensions.extend(companion_extensions(primary));
        }
        extensions
    }
}

impl FileSource for FileReference {
    fn file_name(&self) -> &str {
        self.split().1
    }

    fn extension(&self) -> &str {
        self.split().2
    }

    fn file_name_and_extension(&self) -> String {
        match self.split() {
            (_, stem, "") => stem.to_string(),
            (_, stem, ext) => format!("{stem}.{ext}"),
        }
    }

    fn file_name_and_extension_all_types(&self) -> Vec<String> {
        let stem = self.file_name();
        self.extensions(true)
            .into_iter()
            .map(|ext| format!("{stem}.{ext}"))
            .collect()
    }

    fn absolute_paths(&self, all_types: bool) -> Vec<PathBuf> {
        self.relative_paths(all_types)
            .into_iter()
            .map(|rel| normalize_path(&self.base.join(rel)))
            .collect()
    }

    fn relative_paths(&self, all_types: bool) -> Vec<PathBuf> {
        let (dir, stem, primary) = self.split();
        if primary.is_empty() {
            return vec![PathBuf::from(&self.path)];
        }
        self.extensions(all_types)
            .into_iter()
            .map(|ext| {
                if dir.is_empty() {
                    PathBuf::from(format!("{stem}.{ext}"))
                } else {
                    PathBuf::from(format!("{dir}/{stem}.{ext}"))
                }
            })
            .collect()
    }
}

impl FilePart for FileReference {
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
        let mut line = if self.command.is_empty() {
            self.path.clone()
        } else {
            format!("{} == {}", self.command, self.path)
        };
        if let Some(comment) = &self.comment {
            line.push_str(" ! ");
            line.push_str(comment);
        }
        line
    }

    fn linked_next(&self) -> Option<Ident> {
        self.next
    }

    fn as_file(&self) -> Option<&dyn FileSource> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn zpts() -> FileReference {
        FileReference::new(
            Ident(1),
            "Read GIS Z Shape",
            r"..\model\gis\2d_zsh_M01_001_L.shp",
            "/runs/model",
        )
    }

    #[test]
    fn windows_separators_are_normalized() {
        let part = zpts();
        assert_eq!(part.path(), "../model/gis/2d_zsh_M01_001_L.shp");
        assert_eq!(part.file_name(), "2d_zsh_M01_001_L");
        assert_eq!(part.extension(), "shp");
        assert_eq!(part.category(), "shp");
    }

    #[test]
    fn shapefiles_expand_to_companions() {
        let part = zpts();
        assert_eq!(
            part.file_name_and_extension_all_types(),
            vec![
                "2d_zsh_M01_001_L.shp",
                "2d_zsh_M01_001_L.shx",
                "2d_zsh_M01_001_L.dbf",
            ]
        );
        assert_eq!(part.relative_paths(false).len(), 1);
        assert_eq!(
            part.absolute_paths(true)[2],
            Path::new("/runs/model/gis/2d_zsh_M01_001_L.dbf")
        );
    }

    #[test]
    fn single_file_formats_have_no_companions() {
        let part = FileReference::new(Ident(2), "Read Materials File", "materials.csv", "/m");
        assert_eq!(part.file_name_and_extension_all_types(), vec!["materials.csv"]);
        assert_eq!(part.absolute_paths(true), vec![PathBuf::from("/m/materials.csv")]);
    }

    #[test]
    fn printable_head_and_continuation() {
        let head = zpts().linked_to(Ident(2));
        assert_eq!(
            head.printable(),
            r"Read GIS Z Shape == ../model/gis/2d_zsh_M01_001_L.shp"
        );
        assert_eq!(head.linked_next(), Some(Ident(2)));

        let tail = FileReference::continuation(Ident(2), "gis/pts.shp", "/m").with_comment("tin");
        assert_eq!(tail.printable(), "gis/pts.shp ! tin");
        assert_eq!(tail.command(), "");
    }

    #[test]
    fn extensionless_paths_keep_their_name() {
        let part = FileReference::new(Ident(3), "Output Folder", "results/", "/m");
        assert_eq!(part.extension(), "");
        let part = FileReference::new(Ident(4), "Log Folder", "log", "/m");
        assert_eq!(part.file_name_and_extension(), "log");
        assert_eq!(part.relative_paths(true), vec![PathBuf::from("log")]);
    }
}
