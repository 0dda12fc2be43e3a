//! rpc-health-checker CLI

use clap::Parser;
use rpc_health_checker::cli::{self, Cli, Commands};
use rpc_health_checker::{HttpCaller, MethodCaller};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = cli.resolve_config()?;

    match &cli.command {
        Some(Commands::Config { action }) => cli::config::handle(action, &config),
        Some(Commands::Providers { action }) => cli::providers::handle(action, &config),
        Some(Commands::Run) => cli::check::handle_run(&config, caller()?).await,
        Some(Commands::Check(args)) => cli::check::handle_check(args, &config, caller()?).await,
        Some(Commands::Serve) | None => cli::serve::handle(config, caller()?).await,
    }
}

fn caller() -> anyhow::Result<Arc<dyn MethodCaller>> {
    Ok(Arc::new(HttpCaller::new()?))
}
