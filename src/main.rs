mod bind;
mod commands;
mod compose;
mod content;
mod district;
mod lists;
mod state;
mod ui;

use clap::Parser;
use tracing::Level;

use state::{AppState, SiteConfig};

/// Save Skyline Park site runtime
#[derive(Debug, Parser)]
#[command(name = "skyline", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long = "verbose", global = true, action = clap::ArgAction::SetTrue)]
    verbose: bool,
    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = SiteConfig::from_env()?;
    let state = AppState::init(config).await?;

    commands::run(cli.command, &state).await
}
