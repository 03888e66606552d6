use anyhow::Result;
use clap::Args;

use crate::district::LookupOutcome;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Street address; words are joined with spaces.
    #[arg(value_name = "ADDRESS", required = true, num_args = 1..)]
    pub address: Vec<String>,
    /// Print the result card as HTML.
    #[arg(long = "html", action = clap::ArgAction::SetTrue)]
    pub html: bool,
}

pub async fn lookup(state: &AppState, args: LookupArgs) -> Result<()> {
    let address = args.address.join(" ");

    match state.finder.lookup(&address).await {
        LookupOutcome::Ignored => println!("Enter an address to look up."),
        LookupOutcome::Found(card) if args.html => println!("{}", card.to_html()),
        LookupOutcome::Found(card) => {
            let who = if card.is_fallback {
                format!("District {} (no supervisor on file)", card.district)
            } else {
                format!("District {}", card.district)
            };
            println!("{}: {}", who, card.supervisor.name);
            if let Some(matched) = &card.matched_address {
                println!("Matched: {}", matched);
            }
            println!("Phone:   {} ({})", card.supervisor.phone, card.tel_href);
            println!("Email:   {}", card.supervisor.email);
            println!("Compose: {}", card.mailto);
        }
        LookupOutcome::Failed(e) => println!("{}", e.user_message()),
    }
    Ok(())
}
