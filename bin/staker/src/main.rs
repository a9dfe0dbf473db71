//! Staker client binary.

mod cli;
mod session;

use clap::Parser;
use staker_node_core::{StakerConfig, logging::init_logging};
use tracing::info;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.logs)?;

    match cli.command {
        Commands::Session(args) => {
            let config = StakerConfig::load(cli.config.as_deref(), &args)?;
            info!(
                version = env!("CARGO_PKG_VERSION"),
                contract = %config.ledger.contract(),
                account = %config.ledger.account(),
                "Starting staking session"
            );
            session::run(config).await
        }
    }
}
