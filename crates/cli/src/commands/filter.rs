//! Show the parts a scenario selection switches on.

use anyhow::Result;
use clap::Parser;
use console::style;

use super::ModelArgs;

/// Print the parts directly inside branches matching the given scenarios
#[derive(Parser)]
pub struct Filter {
    #[command(flatten)]
    model: ModelArgs,

    /// Scenario values to select (e.g. DEV TEST)
    #[arg(required = true, value_name = "SCENARIO")]
    scenarios: Vec<String>,
}

impl Filter {
    pub fn execute(self) -> Result<()> {
        let model = self.model.load()?;

        for file in self.model.select(&model)? {
            let parts = file.get_contents_by_scenario(model.parts(), &self.scenarios);
            if parts.is_empty() {
                continue;
            }
            println!("{}", style(file.name()).bold().cyan());
            for part in parts {
                println!("  {} {}", style(part.id()).dim(), part.printable());
            }
        }
        Ok(())
    }
}
