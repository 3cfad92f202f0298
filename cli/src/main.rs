//! `loyalty`: manage clients and loyalty programs from the command line.
//!
//! Builds one `LoyaltyService` per run from `LOYALTY_*` configuration, with
//! `--base-url` taking precedence, and dispatches a single subcommand.

mod args;
mod commands;

use clap::Parser;
use loyalty_core::{ClientConfig, LoyaltyService};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Command};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::load()?.with_base_url(cli.base_url)?;
    let svc = LoyaltyService::from_config(&config);
    tracing::debug!(base_url = svc.base_url(), "using backend");

    match cli.command {
        Command::Overview => commands::overview(&svc).await,
        Command::Programs { action } => commands::programs(&svc, action).await,
        Command::Clients { action } => commands::clients(&svc, action).await,
    }
}
