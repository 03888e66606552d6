// Page template binding over raw HTML strings.
// The scanner is deliberately naive and tailored to the site's static page:
// tag names are matched ASCII case-insensitively, attribute values must not
// contain '>', and a bound element ends at its depth-matched closing tag.

use super::markup::escape_html;
use super::{render_binding, Binding, ElementKind, Rendered};
use crate::content::ContentContext;
use crate::lists;

const CONTENT_ATTR: &str = "data-content";
const SECONDARY_ATTR: &str = "data-content-strong";

/// An opening tag split into name, attributes and self-closing flag.
#[derive(Debug)]
struct OpenTag<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, Option<&'a str>)>,
    self_closing: bool,
}

impl<'a> OpenTag<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let body = raw.strip_prefix('<')?.strip_suffix('>')?;
        if !body.chars().next()?.is_ascii_alphabetic() {
            return None;
        }
        let (body, self_closing) = match body.strip_suffix('/') {
            Some(b) => (b, true),
            None => (body, false),
        };
        let name_end = body
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(body.len());
        Some(Self {
            name: &body[..name_end],
            attrs: parse_attrs(&body[name_end..]),
            self_closing,
        })
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| *v)
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    fn is_void(&self) -> bool {
        self.self_closing
            || matches!(
                self.name.to_ascii_lowercase().as_str(),
                "img" | "input" | "br" | "hr" | "meta" | "link" | "source"
            )
    }

    /// Re-serialize the tag with `name` set to `value`.
    fn with_attr(&self, name: &str, value: &str) -> String {
        let mut out = format!("<{}", self.name);
        for (n, v) in &self.attrs {
            if n.eq_ignore_ascii_case(name) {
                continue;
            }
            match v {
                Some(v) => out.push_str(&format!(" {}=\"{}\"", n, v.replace('"', "&quot;"))),
                None => out.push_str(&format!(" {}", n)),
            }
        }
        out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        out.push_str(if self.self_closing { " />" } else { ">" });
        out
    }
}

fn parse_attrs(s: &str) -> Vec<(&str, Option<&str>)> {
    let mut attrs = Vec::new();
    let mut rest = s;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let name_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    match inner.find(q) {
                        Some(end) => (&inner[..end], &inner[end + 1..]),
                        None => (inner, ""),
                    }
                }
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            if !name.is_empty() {
                attrs.push((name, Some(value)));
            }
            rest = remaining;
        } else if name.is_empty() {
            break;
        } else {
            attrs.push((name, None));
        }
    }
    attrs
}

/// First occurrence of `needle` that is a whole tag name (followed by `>`,
/// `/` or whitespace).
fn find_tag(hay: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = hay.get(from..)?.find(needle) {
        let pos = from + rel;
        match hay[pos + needle.len()..].chars().next() {
            Some('>' | '/' | ' ' | '\t' | '\n' | '\r') => return Some(pos),
            _ => from = pos + needle.len(),
        }
    }
    None
}

/// Byte offset of the closing tag matching an element of `name` opened just
/// before `from`. `lower` must be the ASCII-lowercased document.
fn close_tag_pos(lower: &str, from: usize, name: &str) -> Option<usize> {
    let name = name.to_ascii_lowercase();
    let open = format!("<{name}");
    let close = format!("</{name}");
    let mut depth = 0usize;
    let mut search = from;
    loop {
        let rest = lower.get(search..)?;
        let close_at = find_tag(rest, &close)?;
        match find_tag(rest, &open) {
            Some(open_at) if open_at < close_at => {
                depth += 1;
                search += open_at + open.len();
            }
            _ => {
                if depth == 0 {
                    return Some(search + close_at);
                }
                depth -= 1;
                search += close_at + close.len();
            }
        }
    }
}

/// What to do with an element's content.
enum Action {
    Keep,
    ReplaceTag(String),
    ReplaceInner(String),
}

fn action_for(tag: &OpenTag<'_>, ctx: &ContentContext) -> Action {
    if let Some(path) = tag.attr(CONTENT_ATTR) {
        let binding = Binding {
            path,
            secondary: tag.attr(SECONDARY_ATTR),
            element: ElementKind::from_tag(tag.name),
        };
        return match render_binding(ctx, &binding) {
            Some(Rendered::Alt(alt)) => Action::ReplaceTag(tag.with_attr("alt", &alt)),
            Some(Rendered::Inner(html)) if !tag.is_void() => Action::ReplaceInner(html),
            _ => Action::Keep,
        };
    }

    match tag.attr("id") {
        Some("contacts") => return Action::ReplaceInner(lists::render_contacts(&ctx.contacts())),
        Some("sources") if !ctx.is_fallback() => {
            return Action::ReplaceInner(lists::render_sources(&ctx.sources()))
        }
        _ => {}
    }

    if tag.is("title") {
        if let Some(title) = &ctx.meta().title {
            return Action::ReplaceInner(escape_html(title));
        }
    }

    Action::Keep
}

/// Bind the page template against the content document and return the
/// resulting HTML.
pub fn bind_template(html: &str, ctx: &ContentContext) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len() + 4096);
    let mut cursor = 0;

    while let Some(rel) = html[cursor..].find('<') {
        let start = cursor + rel;
        out.push_str(&html[cursor..start]);
        cursor = start;

        if html[start..].starts_with("<!--") {
            let end = html[start..]
                .find("-->")
                .map(|i| start + i + 3)
                .unwrap_or(html.len());
            out.push_str(&html[start..end]);
            cursor = end;
            continue;
        }

        let Some(gt) = html[start..].find('>') else {
            break;
        };
        let end = start + gt + 1;
        let raw = &html[start..end];
        cursor = end;

        let Some(tag) = OpenTag::parse(raw) else {
            out.push_str(raw);
            continue;
        };

        // Raw-text elements are copied through untouched
        if tag.is("script") || tag.is("style") {
            let close = close_tag_pos(&lower, end, tag.name).unwrap_or(html.len());
            out.push_str(&html[start..close]);
            cursor = close;
            continue;
        }

        match action_for(&tag, ctx) {
            Action::Keep => out.push_str(raw),
            Action::ReplaceTag(new_tag) => out.push_str(&new_tag),
            Action::ReplaceInner(inner) => {
                out.push_str(raw);
                if let Some(close) = close_tag_pos(&lower, end, tag.name) {
                    out.push_str(&inner);
                    cursor = close;
                }
            }
        }
    }

    out.push_str(&html[cursor..]);
    out
}

/// Inner HTML of the first element whose `id` attribute equals `id`.
pub fn element_inner_by_id<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let mut cursor = 0;
    while let Some(rel) = html[cursor..].find('<') {
        let start = cursor + rel;
        let end = start + html[start..].find('>')? + 1;
        cursor = end;
        let Some(tag) = OpenTag::parse(&html[start..end]) else {
            continue;
        };
        if tag.attr("id") == Some(id) && !tag.is_void() {
            let close = close_tag_pos(&lower, end, tag.name)?;
            return Some(&html[end..close]);
        }
    }
    None
}

/// The parts of a page the interactive controllers attach to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageOutline {
    /// `id`s of `<section>` elements, in document order.
    pub sections: Vec<String>,
    pub has_audio: bool,
}

pub fn outline(html: &str) -> PageOutline {
    let mut outline = PageOutline::default();
    let mut cursor = 0;
    while let Some(rel) = html[cursor..].find('<') {
        let start = cursor + rel;
        if html[start..].starts_with("<!--") {
            cursor = html[start..]
                .find("-->")
                .map(|i| start + i + 3)
                .unwrap_or(html.len());
            continue;
        }
        let Some(gt) = html[start..].find('>') else {
            break;
        };
        cursor = start + gt + 1;
        let Some(tag) = OpenTag::parse(&html[start..cursor]) else {
            continue;
        };
        if tag.is("audio") {
            outline.has_audio = true;
        } else if tag.is("section") {
            if let Some(id) = tag.attr("id") {
                outline.sections.push(id.to_string());
            }
        }
    }
    outline
}
