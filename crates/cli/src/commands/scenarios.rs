//! List the scenario values each control file branches on.

use anyhow::Result;
use clap::Parser;
use console::style;

use super::{ModelArgs, OutputFormat};

/// List scenario values used in IF SCENARIO statements
#[derive(Parser)]
pub struct Scenarios {
    #[command(flatten)]
    model: ModelArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Scenarios {
    pub fn execute(self) -> Result<()> {
        let model = self.model.load()?;
        let files = self.model.select(&model)?;

        match self.format {
            OutputFormat::Text => {
                for file in files {
                    let values = file.get_scenario_variables();
                    if values.is_empty() {
                        continue;
                    }
                    println!("{} {}", style(file.name()).bold().cyan(), values.join(", "));
                }
            }
            OutputFormat::Json => {
                let listing: Vec<_> = files
                    .into_iter()
                    .map(|file| {
                        serde_json::json!({
                            "file": file.name(),
                            "scenarios": file.get_scenario_variables(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
        }
        Ok(())
    }
}
