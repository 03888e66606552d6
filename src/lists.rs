use crate::bind::markup::escape_html;
use crate::content::types::{Contact, Source};

const CONTACT_CARD_CLASS: &str = "bg-stone-900 hover:bg-stone-800 border border-stone-700 \
    hover:border-emerald-600 rounded-2xl p-5 transition cursor-pointer group";

/// Render the press contact list. Clicking a card (or its button) copies the
/// email; the `data-copy-email` attribute carries the address for the handler.
pub fn render_contacts(contacts: &[Contact]) -> String {
    let mut out = String::new();
    for c in contacts {
        let name = escape_html(&c.name);
        let email = escape_html(&c.email);
        out.push_str(&format!(
            r#"<div class="{CONTACT_CARD_CLASS}" data-copy-email="{email}">
    <div class="flex justify-between items-start">
        <div>
            <div class="font-semibold text-emerald-300">{name}</div>
            <div class="text-xs text-stone-400 font-mono">{email}</div>
        </div>
        <button type="button" data-copy-email="{email}" class="bg-emerald-900 hover:bg-emerald-700 text-emerald-100 px-4 py-2 rounded-xl text-xs flex items-center gap-2 transition">
            <i class="fas fa-copy"></i> COPY
        </button>
    </div>
</div>
"#
        ));
    }
    out
}

/// Render the source citations as plain anchors opening in a new tab.
pub fn render_sources(sources: &[Source]) -> String {
    let mut out = String::new();
    for s in sources {
        out.push_str(&format!(
            r#"<a href="{url}" target="_blank" rel="noopener" class="block bg-stone-900 hover:bg-stone-800 border border-stone-700 rounded-2xl p-5 transition">
    <div class="font-semibold text-emerald-300">{name}</div>
    <div class="text-sm text-stone-400">{description}</div>
</a>
"#,
            url = escape_html(&s.url),
            name = escape_html(&s.name),
            description = escape_html(&s.description),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contacts_in_order_and_escaped() {
        let contacts = vec![
            Contact { name: "KQED <Desk>".into(), email: "desk@kqed.org".into() },
            Contact { name: "KCRA".into(), email: "news@kcra.com\"onclick=\"x".into() },
        ];
        let html = render_contacts(&contacts);
        let first = html.find("KQED &lt;Desk&gt;").unwrap();
        let second = html.find(">KCRA<").unwrap();
        assert!(first < second);
        assert!(html.contains(r#"data-copy-email="desk@kqed.org""#));
        assert!(html.contains("news@kcra.com&quot;onclick=&quot;x"));
        assert!(!html.contains("\"onclick=\""));
    }

    #[test]
    fn test_empty_lists_render_nothing() {
        assert_eq!(render_contacts(&[]), "");
        assert_eq!(render_sources(&[]), "");
    }

    #[test]
    fn test_sources_are_anchors() {
        let html = render_sources(&[Source {
            name: "Park history".into(),
            url: "https://example.org/a?b=1&c=2".into(),
            description: "Deed & <restrictions>".into(),
        }]);
        assert!(html.starts_with(r#"<a href="https://example.org/a?b=1&amp;c=2" target="_blank""#));
        assert!(html.contains("Deed &amp; &lt;restrictions&gt;"));
    }
}
