use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::bind::template::{bind_template, outline, PageOutline};
use crate::compose::{ComposeAction, EmailTemplate};
use crate::content::ContentContext;
use crate::state::AppState;
use crate::ui::clipboard::{MemoryClipboard, NoShareSheet};
use crate::ui::events::UiEvent;
use crate::ui::{PageEnv, Site, SiteSnapshot};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// One JSON event per line, e.g. {"type":"menu_toggle"}.
    #[arg(value_name = "EVENTS")]
    pub events: PathBuf,
    /// Page template to take section ids and the audio element from.
    #[arg(long = "template", value_name = "FILE")]
    pub template: Option<PathBuf>,
    /// Extra section id to observe (repeatable).
    #[arg(long = "section", value_name = "ID")]
    pub sections: Vec<String>,
    /// Behave as if the user prefers reduced motion.
    #[arg(long = "reduced-motion", action = clap::ArgAction::SetTrue)]
    pub reduced_motion: bool,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    events: usize,
    default_prevented: usize,
    compose: Vec<ComposeAction>,
    clipboard: Option<String>,
    snapshot: SiteSnapshot,
}

fn parse_events(raw: &str) -> Result<Vec<UiEvent>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Bad event on line {}", i + 1))
        })
        .collect()
}

/// Outline of the page and the letter its bound `#template` shows.
fn page_setup(page: Option<&str>, ctx: &ContentContext) -> (PageOutline, Option<EmailTemplate>) {
    match page {
        Some(page) => (
            outline(page),
            EmailTemplate::from_page_html(&bind_template(page, ctx)),
        ),
        None => (PageOutline::default(), None),
    }
}

pub async fn replay(state: &AppState, args: ReplayArgs) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.events)
        .await
        .with_context(|| format!("Failed to read {}", args.events.display()))?;
    let events = parse_events(&raw)?;

    let html = match &args.template {
        Some(path) => Some(super::read_page(path).await?),
        None => None,
    };
    let (mut page, template) = page_setup(html.as_deref(), &state.content);
    page.sections.extend(args.sections);

    let finder = match &template {
        Some(t) => state.finder_with(t.clone()),
        None => Arc::clone(&state.finder),
    };

    let env = PageEnv {
        page_url: state.page_url(),
        sections: page.sections,
        prefers_reduced_motion: args.reduced_motion,
        has_audio: page.has_audio,
        template,
    };
    let mut site = Site::new(
        &state.content,
        &state.ui,
        &env,
        MemoryClipboard::default(),
        NoShareSheet,
        finder,
    );
    info!(events = events.len(), sections = env.sections.len(), "Replaying UI events");

    let mut default_prevented = 0;
    let mut compose = Vec::new();
    for event in &events {
        debug!(?event, "dispatch");
        let out = site.dispatch(event).await;
        if out.default_prevented {
            default_prevented += 1;
        }
        compose.extend(out.compose);
    }

    let report = ReplayReport {
        events: events.len(),
        default_prevented,
        compose,
        clipboard: site.actions().clipboard().contents(),
        snapshot: site.snapshot(),
    };
    site.teardown();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events_skips_blank_lines() {
        let events = parse_events(
            "{\"type\":\"menu_toggle\"}\n\n{\"type\":\"address_input\",\"value\":\"1 Main St\"}\n",
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                UiEvent::MenuToggle,
                UiEvent::AddressInput { value: "1 Main St".into() },
            ]
        );
    }

    #[test]
    fn test_page_setup_uses_static_template_on_fallback() {
        let page = r#"<section id="about"></section>
<pre id="template" data-content="template.body">Subject: From the page

Dear [Media Contact / Supervisor],</pre>"#;
        let (outline, template) = page_setup(Some(page), &ContentContext::fallback());
        assert_eq!(outline.sections, vec!["about".to_string()]);
        let (subject, body) = template.unwrap().subject_and_body();
        assert_eq!(subject, "From the page");
        assert_eq!(body, "Dear [Media Contact / Supervisor],");

        let (_, none) = page_setup(None, &ContentContext::fallback());
        assert!(none.is_none());
    }

    #[test]
    fn test_parse_events_reports_line() {
        let err = parse_events("{\"type\":\"menu_toggle\"}\n{\"type\":\"nope\"}").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
