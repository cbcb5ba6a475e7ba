pub mod commands;
pub mod errors;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(name = "dashboard_stats")]
#[clap(about = "Derive dashboard trend statistics from exported API records")]
#[clap(version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Compute(commands::compute::ComputeArgs),
    Presets(commands::presets::PresetsArgs),
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compute(args) => commands::compute::run(args).await,
        Commands::Presets(args) => commands::presets::run(args),
    }
}
