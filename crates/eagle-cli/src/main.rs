//! EAGLE CLI - Command-line interface
//!
//! Runs the query pipeline and inference from a terminal, and reports which
//! backends the current configuration selects.

mod cli;
mod commands;
mod output;
mod output_types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { commands::execute(cli).await })?;

    Ok(())
}
