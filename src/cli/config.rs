//! Configuration management commands

use crate::config::CheckerConfig;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the default config file path
    Path,

    /// Show the resolved config, defaults and overrides included
    Show,
}

pub fn handle(action: &ConfigCommands, config: &CheckerConfig) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Path => {
            println!("{}", CheckerConfig::default_path().display());
        }

        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }

    Ok(())
}
