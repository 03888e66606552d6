use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::debug;

use crate::bind::template::element_inner_by_id;
use crate::content::ContentContext;

pub const DEFAULT_SUBJECT: &str = "Save Skyline Park";

/// Placeholder in the email template replaced by a recipient's name.
pub const RECIPIENT_PLACEHOLDER: &str = "[Media Contact / Supervisor]";

/// Webmail providers cap URL length; longer bodies are cut to this many chars.
pub const MAX_BODY_CHARS: usize = 700;

pub const TRUNCATION_NOTICE: &str =
    "\n\n[Message shortened for this link. Copy the full template from the website.]";

const DEFAULT_TEMPLATE: &str = "Subject: Save Skyline Park\n\n\
Dear [Media Contact / Supervisor],\n\n\
Skyline Wilderness Park belongs to the people of Napa County. \
Please keep it public, keep it open, and keep it wild.\n\n\
Sincerely,\nA Napa County resident";

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// The letter users send, as visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    text: String,
}

impl EmailTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Template from the content document (`template.body`), else the built-in letter.
    pub fn from_context(ctx: &ContentContext) -> Self {
        Self::new(
            ctx.text("template.body")
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        )
    }

    /// Template from a rendered page: the visible text of `#template`.
    pub fn from_page_html(html: &str) -> Option<Self> {
        let inner = element_inner_by_id(html, "template")?;
        Some(Self::new(visible_text(inner)))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn subject_and_body(&self) -> (String, String) {
        template_subject_and_body(&self.text)
    }

    /// The template with the recipient placeholder filled in.
    pub fn addressed_to(&self, name: &str) -> Self {
        Self::new(self.text.replace(RECIPIENT_PLACEHOLDER, name))
    }
}

/// Visible text of an HTML fragment, the way a browser's `innerText` reads it.
pub fn visible_text(html: &str) -> String {
    let wrapped = if html.contains('<') {
        html.to_string()
    } else {
        // Bare text (e.g. the inside of a <pre>) keeps its line structure
        format!("<pre>{}</pre>", html)
    };
    // No decorations: emphasis and links read as their plain text
    html2text::config::plain_no_decorate()
        .string_from_read(wrapped.as_bytes(), 1_000)
        .unwrap_or_else(|_| html.to_string())
        .trim()
        .to_string()
}

/// Split a template into subject and body. The subject is the first
/// `Subject:` line (case-insensitive); the body is everything after the first
/// blank line, or the whole text when there is none.
pub fn template_subject_and_body(text: &str) -> (String, String) {
    let text = text.replace("\r\n", "\n");

    let subject = text
        .lines()
        .find_map(|line| {
            let line = line.trim_start();
            let (head, rest) = (line.get(..8)?, line.get(8..)?);
            if !head.eq_ignore_ascii_case("subject:") {
                return None;
            }
            let rest = rest.trim();
            (!rest.is_empty()).then(|| rest.to_string())
        })
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

    let mut offset = 0;
    let mut body_start = None;
    for (i, line) in text.split('\n').enumerate() {
        offset += line.len() + 1;
        if i > 0 && line.trim().is_empty() {
            body_start = Some(offset.min(text.len()));
            break;
        }
    }
    let body = match body_start {
        Some(start) => text[start..].trim(),
        None => text.trim(),
    };

    (subject, body.to_string())
}

/// Cap an overlong body at [`MAX_BODY_CHARS`] chars and append the notice.
pub fn cap_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let mut capped: String = body.chars().take(MAX_BODY_CHARS).collect();
    capped.push_str(TRUNCATION_NOTICE);
    capped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gmail,
    Outlook,
    Yahoo,
    Mailto,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gmail" => Ok(Provider::Gmail),
            "outlook" => Ok(Provider::Outlook),
            "yahoo" => Ok(Provider::Yahoo),
            "mailto" | "mail" | "default" => Ok(Provider::Mailto),
            other => Err(anyhow::anyhow!("unknown mail provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeUrls {
    pub gmail: String,
    pub outlook: String,
    pub yahoo: String,
    pub mailto: String,
}

impl ComposeUrls {
    pub fn url(&self, provider: Provider) -> &str {
        match provider {
            Provider::Gmail => &self.gmail,
            Provider::Outlook => &self.outlook,
            Provider::Yahoo => &self.yahoo,
            Provider::Mailto => &self.mailto,
        }
    }
}

pub fn build_compose_urls(subject: &str, body: &str) -> ComposeUrls {
    let su = encode_component(subject);
    let b = encode_component(&cap_body(body));
    ComposeUrls {
        gmail: format!("https://mail.google.com/mail/?view=cm&fs=1&su={su}&body={b}"),
        outlook: format!("https://outlook.live.com/mail/0/deeplink/compose?subject={su}&body={b}"),
        yahoo: format!("https://compose.mail.yahoo.com/?subject={su}&body={b}"),
        mailto: format!("mailto:?subject={su}&body={b}"),
    }
}

/// A `mailto:` link to one recipient, with the same body cap.
pub fn mailto_url(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        to,
        encode_component(subject),
        encode_component(&cap_body(body))
    )
}

/// How the page hands a compose URL to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum ComposeAction {
    /// Webmail: open in a new tab.
    OpenTab(String),
    /// Mail app: a throwaway anchor is clicked and removed; no new tab.
    Navigate(String),
}

/// Resolve a provider name to its compose action. Unknown providers do nothing.
pub fn open_compose(template: &EmailTemplate, provider: &str) -> Option<ComposeAction> {
    let Ok(provider) = provider.parse::<Provider>() else {
        debug!(provider, "Ignoring compose request for unknown provider");
        return None;
    };
    let (subject, body) = template.subject_and_body();
    let url = build_compose_urls(&subject, &body).url(provider).to_string();
    Some(match provider {
        Provider::Mailto => ComposeAction::Navigate(url),
        _ => ComposeAction::OpenTab(url),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub twitter: String,
    pub facebook: String,
}

pub fn social_links(page_url: &str, share_text: &str) -> SocialLinks {
    let u = encode_component(page_url);
    let t = encode_component(share_text);
    SocialLinks {
        twitter: format!("https://twitter.com/intent/tweet?text={t}&url={u}"),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={u}"),
    }
}
