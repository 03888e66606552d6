use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::bind::template::bind_template;
use crate::compose::{open_compose, ComposeAction, EmailTemplate};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// gmail, outlook, yahoo or mailto.
    #[arg(value_name = "PROVIDER")]
    pub provider: String,
    /// Take the template from this page's `#template` element after binding.
    #[arg(long = "template", value_name = "FILE")]
    pub template: Option<PathBuf>,
}

pub async fn compose(state: &AppState, args: ComposeArgs) -> Result<()> {
    let template = match &args.template {
        Some(path) => {
            let page = bind_template(&super::read_page(path).await?, &state.content);
            match EmailTemplate::from_page_html(&page) {
                Some(t) => t,
                None => bail!("{} has no element with id=\"template\"", path.display()),
            }
        }
        None => EmailTemplate::from_context(&state.content),
    };

    match open_compose(&template, &args.provider) {
        Some(ComposeAction::OpenTab(url)) => println!("open in new tab: {}", url),
        Some(ComposeAction::Navigate(url)) => println!("navigate: {}", url),
        None => bail!("unknown mail provider '{}' (expected gmail, outlook, yahoo or mailto)", args.provider),
    }
    Ok(())
}
