use anyhow::{bail, Result};

use crate::compose::social_links;
use crate::state::AppState;

pub fn share_links(state: &AppState) -> Result<()> {
    let page_url = state.page_url();
    if page_url.is_empty() {
        bail!("no page URL: set meta.siteUrl in the content document or SKYLINE_SITE_URL");
    }
    let share_text = state.content.meta().share_text.clone().unwrap_or_default();

    let links = social_links(&page_url, &share_text);
    println!("X/Twitter: {}", links.twitter);
    println!("Facebook:  {}", links.facebook);
    Ok(())
}
