//! CLI command modules
//!
//! Each subcommand has its own module with argument definitions and handlers.

pub mod check;
pub mod config;
pub mod providers;
pub mod serve;

use crate::config::CheckerConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpc-health-checker")]
#[command(
    version,
    about = "Validate JSON-RPC providers against a trusted reference and publish the healthy ones"
)]
#[command(after_help = r#"EXAMPLES:
    # Validate periodically and serve the result on :8080
    rpc-health-checker serve

    # One validation pass, then exit
    rpc-health-checker run

    # Check the providers of a single chain
    rpc-health-checker check --chain-id 137

    # Show configured chains and providers
    rpc-health-checker providers list

ENVIRONMENT VARIABLES:
    PORT        Port the server listens on (overrides listen_addr)
    RUST_LOG    Log filter (overrides -v)
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Checker config file (JSON, or TOML with a .toml extension)
    #[arg(long, global = true)]
    pub checker_config: Option<PathBuf>,

    /// Candidate providers file
    #[arg(long, global = true)]
    pub default_providers: Option<PathBuf>,

    /// Reference providers file
    #[arg(long, global = true)]
    pub reference_providers: Option<PathBuf>,

    /// Server port
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate periodically and serve the valid providers (default)
    Serve,

    /// Run one validation pass and write the output file
    Run,

    /// Validate a single chain and print per-provider results
    Check(check::CheckArgs),

    /// Inspect configured providers
    Providers {
        #[command(subcommand)]
        action: providers::ProviderCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigCommands,
    },
}

impl Cli {
    /// Checker config with command-line overrides applied
    pub fn resolve_config(&self) -> anyhow::Result<CheckerConfig> {
        let mut config = match &self.checker_config {
            Some(path) => CheckerConfig::load(path)?,
            None => CheckerConfig::load_or_default(&CheckerConfig::default_path())?,
        };

        if let Some(path) = &self.default_providers {
            config.default_providers_path = path.clone();
        }
        if let Some(path) = &self.reference_providers {
            config.reference_providers_path = path.clone();
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }

        Ok(config)
    }
}
