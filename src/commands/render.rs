use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::bind::template::bind_template;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Static page template to bind.
    #[arg(long = "template", value_name = "FILE")]
    pub template: PathBuf,
    /// Write the bound page here instead of stdout.
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,
}

pub async fn render(state: &AppState, args: RenderArgs) -> Result<()> {
    let page = super::read_page(&args.template).await?;
    let bound = bind_template(&page, &state.content);

    match args.out {
        Some(out) => {
            tokio::fs::write(&out, &bound)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(out = %out.display(), bytes = bound.len(), "Page rendered");
        }
        None => print!("{}", bound),
    }
    Ok(())
}
