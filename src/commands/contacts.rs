use anyhow::Result;
use clap::Args;

use crate::lists::render_contacts;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct ContactsArgs {
    /// Print the rendered contact cards instead of a plain list.
    #[arg(long = "html", action = clap::ArgAction::SetTrue)]
    pub html: bool,
}

pub fn contacts(state: &AppState, args: ContactsArgs) -> Result<()> {
    let contacts = state.content.contacts();
    if args.html {
        println!("{}", render_contacts(&contacts));
        return Ok(());
    }

    if state.content.is_fallback() {
        println!("(content unavailable, showing built-in contacts)");
    }
    let width = contacts.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
    for c in &contacts {
        println!("{:<width$}  {}", c.name, c.email, width = width);
    }
    Ok(())
}
