//! Suitudy CLI - build marketplace transactions and query the ledger.
//!
//! `suitudy build ...` prints a wallet-ready transaction intent as JSON.
//! `suitudy query ...` runs the read-side marketplace queries.

mod commands;
mod common;
mod output;

use clap::Parser;
use commands::{BuildCommand, QueryCommand};
use common::GlobalOpts;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Suitudy CLI - Interact with the Suitudy lecture marketplace.
#[derive(Parser, Debug)]
#[command(name = "suitudy", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Build a marketplace transaction and print it as JSON
    #[command(subcommand)]
    Build(BuildCommand),

    /// Query balances, listings and passes
    #[command(subcommand)]
    Query(QueryCommand),
}

fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = match cli.command {
        Command::Build(cmd) => cmd.run(&cli.global).await,
        Command::Query(cmd) => cmd.run(&cli.global).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
