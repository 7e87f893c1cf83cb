mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::announce::{self, AnnounceArgs};
use crate::cmd::config as config_cmd;
use crate::error::AppResult;

const LOG_ENV: &str = "CHANGECAST_LOG";

#[derive(Parser)]
#[command(
    name = "changecast",
    author,
    version,
    about = "Announce the most-changed documentation pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect recent changes and announce the affected pages.
    Announce(AnnounceArgs),
    /// Show which sources and channels the environment enables.
    Config,
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Announce(args) => announce::run(args).await,
        Commands::Config => config_cmd::run(),
    }
}
