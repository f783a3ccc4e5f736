//! Command implementations

mod doctor;
mod infer;
mod query;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use eagle_core::config::AppConfig;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Query(args) => query::execute(args, &config, cli.offline, &output).await,
        Commands::Infer(args) => infer::execute(args, &config, &output).await,
        Commands::Doctor(args) => doctor::execute(args, &config, cli.offline, &output).await,
    }
}

/// Defaults, then file, then environment, then command-line flags
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::with_defaults()
            .load_from_file(path)
            .and_then(AppConfig::load_from_env)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };
    config.update_from_cli(cli.overrides());
    Ok(config)
}
