//! List the files referenced by control files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use model_core::{EntryTag, FileQuery, ModelFile, NameStyle, PartRegistry};

use super::{ModelArgs, OutputFormat};

/// List referenced files, optionally filtered
#[derive(Parser)]
pub struct Files {
    #[command(flatten)]
    model: ModelArgs,

    /// Only entries with this tag (model, gis, data, result, unknown_file)
    #[arg(short, long, value_name = "TAG")]
    tag: Option<EntryTag>,

    /// Only files with this extension (repeatable)
    #[arg(short, long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Leave out result and output locations
    #[arg(long)]
    no_results: bool,

    /// Expand multi-file formats (shp also lists shx and dbf)
    #[arg(long)]
    all_types: bool,

    /// What to print for each file
    #[arg(long, value_enum, default_value = "name")]
    show: Show,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Show {
    /// File name with extension
    Name,
    /// File name without extension
    Stem,
    /// Path as written, relative to the control file
    Relative,
    /// Resolved absolute path
    Absolute,
}

impl Files {
    pub fn execute(self) -> Result<()> {
        let model = self.model.load()?;
        let query = self.query();

        let listing: Vec<(&str, Vec<String>)> = self
            .model
            .select(&model)?
            .into_iter()
            .map(|file| (file.name(), self.list(file, model.parts(), &query)))
            .collect();

        match self.format {
            OutputFormat::Text => {
                for (name, entries) in &listing {
                    if entries.is_empty() {
                        continue;
                    }
                    println!("{}", style(name).bold().cyan());
                    for entry in entries {
                        println!("  {entry}");
                    }
                }
            }
            OutputFormat::Json => {
                let json: Vec<_> = listing
                    .iter()
                    .map(|(name, entries)| serde_json::json!({ "file": name, "files": entries }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Ok(())
    }

    fn query(&self) -> FileQuery {
        let mut query = FileQuery::new().with_extensions(self.extensions.iter().cloned());
        if let Some(tag) = self.tag {
            query = query.with_tag(tag);
        }
        if self.no_results {
            query = query.without_results();
        }
        query
    }

    fn list(&self, file: &ModelFile, parts: &PartRegistry, query: &FileQuery) -> Vec<String> {
        let display = |paths: Vec<PathBuf>| -> Vec<String> {
            paths
                .into_iter()
                .map(|p| p.display().to_string())
                .collect()
        };
        match self.show {
            Show::Name | Show::Stem => {
                let names = NameStyle {
                    with_extension: matches!(self.show, Show::Name),
                    all_types: self.all_types,
                };
                file.get_file_names(parts, query, names)
            }
            Show::Relative => display(file.get_relative_paths(parts, query, self.all_types)),
            Show::Absolute => display(file.get_absolute_paths(parts, query, self.all_types)),
        }
    }
}
