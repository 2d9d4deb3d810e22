//! Command implementations for ctlfile
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check;
mod files;
mod filter;
mod render;
mod scenarios;

pub use check::Check;
pub use files::Files;
pub use filter::Filter;
pub use render::Render;
pub use scenarios::Scenarios;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use model_content::LayoutLoader;
use model_core::{ControlModel, ModelFile};

/// Layout selection shared by every command.
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Layout file describing the control model (RON)
    #[arg(value_name = "LAYOUT")]
    layout: PathBuf,

    /// Only operate on this control file (e.g. M01_5m_001.tgc)
    #[arg(short, long, value_name = "NAME")]
    file: Option<String>,
}

impl ModelArgs {
    pub fn load(&self) -> Result<ControlModel> {
        LayoutLoader::load(&self.layout)
    }

    /// The selected control file, or every file in load order.
    pub fn select<'a>(&self, model: &'a ControlModel) -> Result<Vec<&'a ModelFile>> {
        match &self.file {
            Some(name) => model
                .file_by_name(name)
                .map(|file| vec![file])
                .ok_or_else(|| {
                    anyhow!(
                        "Control file '{}' is not part of {}",
                        name,
                        self.layout.display()
                    )
                }),
            None => Ok(model.files().iter().collect()),
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document on stdout
    Json,
}
