//! `ctlfile`: inspect the control files of a hydraulic model.
//!
//! The model is described by a RON layout file; see `model-content` for its
//! format. Every command is read-only.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{Check, Files, Filter, Render, Scenarios};
use config::CliConfig;

/// Inspect control files of a hydraulic model
#[derive(Parser)]
#[command(name = "ctlfile")]
#[command(about = "Inspect control files of a hydraulic model", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print control files reconstructed from the model
    Render(Render),

    /// Report referenced input files missing on disk
    Check(Check),

    /// List referenced files
    Files(Files),

    /// List scenario values per control file
    Scenarios(Scenarios),

    /// Show what a scenario selection switches on
    Filter(Filter),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for CTLFILE_* settings)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render(cmd) => cmd.execute(CliConfig::from_env()),
        Command::Check(cmd) => cmd.execute(),
        Command::Files(cmd) => cmd.execute(),
        Command::Scenarios(cmd) => cmd.execute(),
        Command::Filter(cmd) => cmd.execute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_requires_a_scenario() {
        assert!(Cli::try_parse_from(["ctlfile", "filter", "layout.ron"]).is_err());
        assert!(Cli::try_parse_from(["ctlfile", "filter", "layout.ron", "DEV", "TEST"]).is_ok());
    }
}
