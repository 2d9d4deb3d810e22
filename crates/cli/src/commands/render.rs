//! Print the reconstructed text of control files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use super::ModelArgs;
use crate::config::CliConfig;

/// Render control files back to text
#[derive(Parser)]
pub struct Render {
    #[command(flatten)]
    model: ModelArgs,

    /// TOML render config (overrides CTLFILE_RENDER_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replace auto-companion commands with `<command> Auto` lines
    #[arg(long)]
    auto: bool,

    /// Spaces per open scenario block
    #[arg(long, value_name = "N")]
    indent: Option<usize>,
}

impl Render {
    pub fn execute(self, mut settings: CliConfig) -> Result<()> {
        if let Some(path) = self.config {
            settings.render_config = Some(path);
        }
        if self.auto {
            settings.auto_companion = Some(true);
        }
        if let Some(width) = self.indent {
            settings.indent_width = Some(width);
        }
        let config = settings.render_config()?;

        let model = self.model.load()?;
        let files = self.model.select(&model)?;
        let headers = files.len() > 1;

        for file in files {
            let text = file
                .render_text(model.parts(), &config)
                .with_context(|| format!("Failed to render {}", file.name()))?;
            if headers {
                println!("{}", style(format!("==> {} <==", file.name())).bold().cyan());
            }
            print!("{text}");
        }

        Ok(())
    }
}
