//! Command-line interface

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::Config;

/// Ansible dynamic inventory for AWS
#[derive(Parser, Debug)]
#[command(name = "cloudhost", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["list", "host", "set_env"])
))]
pub struct Cli {
    /// List inventory
    #[arg(long)]
    pub list: bool,

    /// Get details for a specific host
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Write ALB and RDS endpoints as shell exports
    #[arg(long)]
    pub set_env: bool,

    /// Regions to query (defaults to the configured regions)
    #[arg(long, value_name = "REGION", num_args = 1..)]
    pub regions: Vec<String>,

    /// Output file for --set-env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What the invocation should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Host(String),
    SetEnv(PathBuf),
}

/// Fully resolved invocation: CLI flags layered over the config file
#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,
    pub regions: Vec<String>,
}

impl Cli {
    /// Merge flags over configuration
    #[must_use]
    pub fn resolve(&self, config: &Config) -> Invocation {
        let mode = if let Some(host) = &self.host {
            Mode::Host(host.clone())
        } else if self.set_env {
            Mode::SetEnv(
                self.env_file
                    .clone()
                    .unwrap_or_else(|| config.env_file.clone()),
            )
        } else {
            Mode::List
        };

        let regions = if self.regions.is_empty() {
            config.regions.clone()
        } else {
            self.regions.clone()
        };

        Invocation { mode, regions }
    }

    /// Log filter directive from `-v` count, if any
    #[must_use]
    pub fn verbosity(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
