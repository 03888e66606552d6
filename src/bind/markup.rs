//! String-level HTML helpers for bound content. Every helper escapes its
//! input first; markup is only ever introduced by the helper itself.

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape, then wrap each `**pair**` in `<strong>`. An unpaired `**` is kept
/// literally.
pub fn render_bold(s: &str) -> String {
    let escaped = escape_html(s);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut rest = escaped.as_str();

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if end == 0 {
            // "****" has nothing to embolden
            out.push_str(&rest[..start + 2]);
            rest = after;
            continue;
        }
        out.push_str(&rest[..start]);
        out.push_str("<strong>");
        out.push_str(&after[..end]);
        out.push_str("</strong>");
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Escape, then turn newlines into `<br>`.
pub fn line_breaks(s: &str) -> String {
    escape_html(&s.replace("\r\n", "\n")).replace('\n', "<br>")
}

/// Primary text followed by a bold secondary fragment.
pub fn emphasized(primary: &str, secondary: &str) -> String {
    format!(
        "{} <strong>{}</strong>",
        escape_html(primary),
        escape_html(secondary)
    )
}

/// Escape, then turn the first occurrence of `link_text` into an anchor.
/// Without a URL, or when the text is absent, this is plain escaping.
pub fn inject_link(s: &str, link_text: &str, url: Option<&str>) -> String {
    let escaped = escape_html(s);
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return escaped;
    };
    let needle = escape_html(link_text);
    let Some(pos) = escaped.find(&needle) else {
        return escaped;
    };

    format!(
        "{}<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>{}",
        &escaped[..pos],
        escape_html(url),
        needle,
        &escaped[pos + needle.len()..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_bold_pairs() {
        assert_eq!(
            render_bold("Keep **Skyline** public, **forever**."),
            "Keep <strong>Skyline</strong> public, <strong>forever</strong>."
        );
    }

    #[test]
    fn test_bold_escapes_source_html() {
        let out = render_bold("<script>x</script> **<b>bad</b>** & more");
        assert_eq!(
            out,
            "&lt;script&gt;x&lt;/script&gt; <strong>&lt;b&gt;bad&lt;/b&gt;</strong> &amp; more"
        );
        assert!(!out.contains("<script>"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn test_bold_unpaired_marker_kept() {
        assert_eq!(render_bold("a **b"), "a **b");
        assert_eq!(render_bold("**** x"), "**** x");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(line_breaks("Save\nSkyline <Park>"), "Save<br>Skyline &lt;Park&gt;");
        assert_eq!(line_breaks("a\r\nb"), "a<br>b");
    }

    #[test]
    fn test_emphasized() {
        assert_eq!(
            emphasized("Show up Tuesday.", "Bring a neighbor & a sign."),
            "Show up Tuesday. <strong>Bring a neighbor &amp; a sign.</strong>"
        );
    }

    #[test]
    fn test_inject_link() {
        let out = inject_link(
            "Contact the Napa County Board of Supervisors today.",
            "Napa County Board of Supervisors",
            Some("https://www.countyofnapa.org/bos?a=1&b=2"),
        );
        assert_eq!(
            out,
            "Contact the <a href=\"https://www.countyofnapa.org/bos?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener\">Napa County Board of Supervisors</a> today."
        );
    }

    #[test]
    fn test_inject_link_without_url_or_match() {
        assert_eq!(inject_link("a < b", "c", Some("https://x")), "a &lt; b");
        assert_eq!(inject_link("link me", "link", None), "link me");
    }
}
