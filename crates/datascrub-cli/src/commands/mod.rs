//! Command implementations

mod clean;
mod config;
mod inspect;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Clean(args) => clean::execute(args, &output),
        Commands::Inspect(args) => inspect::execute(args, &output),
        Commands::Config(args) => config::execute(args, &output),
    }
}
