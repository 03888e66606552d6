mod compose;
mod contacts;
mod lookup;
mod render;
mod replay;
mod share;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bind a page template with the content document
    Render(render::RenderArgs),
    /// Find the supervisor for an address
    Lookup(lookup::LookupArgs),
    /// Print the compose link for a mail provider
    Compose(compose::ComposeArgs),
    /// Print the social share links for the page
    ShareLinks,
    /// Print the press contact list
    Contacts(contacts::ContactsArgs),
    /// Feed recorded UI events through the page controllers
    Replay(replay::ReplayArgs),
}

pub async fn run(command: Command, state: &AppState) -> Result<()> {
    match command {
        Command::Render(args) => render::render(state, args).await,
        Command::Lookup(args) => lookup::lookup(state, args).await,
        Command::Compose(args) => compose::compose(state, args).await,
        Command::ShareLinks => share::share_links(state),
        Command::Contacts(args) => contacts::contacts(state, args),
        Command::Replay(args) => replay::replay(state, args).await,
    }
}

async fn read_page(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read page template {}", path.display()))
}
