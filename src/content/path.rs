use serde_json::Value;

/// Resolve a dotted path (`hero.title`, `sources.0.url`) against the content
/// document. Paths starting with `_` are private and always resolve to `None`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() || path.starts_with('_') {
        return None;
    }

    let mut node = root;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Resolve a path to a renderable string. Numbers and booleans are
/// stringified; null, objects and arrays count as malformed and are skipped.
pub fn resolve_text(root: &Value, path: &str) -> Option<String> {
    match resolve(root, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "hero": { "title": "Save\nSkyline", "year": 2025 },
            "_draft": { "title": "hidden" },
            "sources": [ { "url": "https://example.org" } ],
            "empty": null
        })
    }

    #[test]
    fn test_nested_lookup() {
        assert_eq!(resolve_text(&doc(), "hero.title").as_deref(), Some("Save\nSkyline"));
        assert_eq!(resolve_text(&doc(), "hero.year").as_deref(), Some("2025"));
    }

    #[test]
    fn test_array_index_segment() {
        assert_eq!(
            resolve_text(&doc(), "sources.0.url").as_deref(),
            Some("https://example.org")
        );
        assert!(resolve(&doc(), "sources.7.url").is_none());
        assert!(resolve(&doc(), "sources.first").is_none());
    }

    #[test]
    fn test_underscore_paths_are_absent() {
        assert!(resolve(&doc(), "_draft.title").is_none());
        assert!(resolve(&doc(), "_draft").is_none());
        assert!(resolve(&doc(), "_").is_none());
    }

    #[test]
    fn test_malformed_values_skipped() {
        assert!(resolve_text(&doc(), "empty").is_none());
        assert!(resolve_text(&doc(), "hero").is_none());
        assert!(resolve_text(&doc(), "hero..title").is_none());
        assert!(resolve_text(&doc(), "missing.path").is_none());
    }
}
