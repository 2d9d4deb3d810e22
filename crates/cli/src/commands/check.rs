//! Report referenced input files that do not exist on disk.

use anyhow::Result;
use clap::Parser;
use console::style;
use model_content::FileSystemOracle;
use model_core::MissingFile;
use serde::Serialize;

use super::{ModelArgs, OutputFormat};

/// Check that every referenced input file exists
#[derive(Parser)]
pub struct Check {
    #[command(flatten)]
    model: ModelArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct MissingReport<'a> {
    file: &'a str,
    #[serde(flatten)]
    missing: MissingFile,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let model = self.model.load()?;
        let oracle = FileSystemOracle::new();

        let mut report = Vec::new();
        for file in self.model.select(&model)? {
            for missing in file.test_exists(model.parts(), &oracle) {
                tracing::warn!("{}: missing {}", file.name(), missing.path.display());
                report.push(MissingReport {
                    file: file.name(),
                    missing,
                });
            }
        }

        match self.format {
            OutputFormat::Text => print_text(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if !report.is_empty() {
            anyhow::bail!("{} referenced file(s) missing", report.len());
        }
        Ok(())
    }
}

fn print_text(report: &[MissingReport<'_>]) {
    if report.is_empty() {
        println!("{}", style("All referenced files exist").green());
        return;
    }
    println!("{}", style("Missing files:").bold().yellow());
    for entry in report {
        println!(
            "  {} {} ({})",
            style(entry.file).cyan(),
            entry.missing.name,
            style(entry.missing.path.display()).dim()
        );
    }
}
