//! cloudhost
//!
//! Ansible dynamic inventory script backed by EC2, RDS and ELBv2

use std::io;
use std::sync::Arc;

use clap::Parser;
use cloudhost_aws::AwsCloud;
use cloudhost_inventory::InventoryBuilder;
use color_eyre::Result;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Mode};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();
    let (config, config_source) =
        Config::load_default(cli.config.as_deref()).wrap_err("failed to load config")?;

    // stdout carries the inventory, so logs go to stderr
    let level = cli.verbosity().unwrap_or(config.log_level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match &config_source {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    let invocation = cli.resolve(&config);
    tracing::debug!(regions = ?invocation.regions, mode = ?invocation.mode, "resolved invocation");

    let cloud = AwsCloud::from_env().await;
    let builder = InventoryBuilder::new(Arc::new(cloud), config.connection.clone());
    let regions = &invocation.regions;

    match &invocation.mode {
        Mode::List => commands::list(&builder, regions, &mut io::stdout().lock()).await?,
        Mode::Host(name) => {
            commands::host(&builder, regions, name, &mut io::stdout().lock()).await?;
        }
        Mode::SetEnv(path) => commands::set_env(&builder, regions, path).await?,
    }

    Ok(())
}
