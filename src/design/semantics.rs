//! External override maps consulted before any heuristic

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Per-node override supplied by the exporter or an author
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SemanticOverride {
    pub tag: Option<String>,
    pub href: Option<String>,
    pub label: Option<String>,
    pub role: Option<String>,
    pub alt: Option<String>,
}

/// Node id -> semantic override
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct SemanticsMap(HashMap<String, SemanticOverride>);

impl SemanticsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&SemanticOverride> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, value: SemanticOverride) {
        self.0.insert(id.into(), value);
    }

    /// Tag override for a node, lowercased; names that are not valid tag
    /// names are ignored
    pub fn tag(&self, id: &str) -> Option<String> {
        self.get(id)
            .and_then(|o| o.tag.as_deref())
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| is_tag_name(t))
    }

    pub fn role(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(|o| o.role.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(|o| o.label.as_deref())
            .filter(|l| !l.trim().is_empty())
    }

    pub fn href(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(|o| o.href.as_deref())
    }
}

fn is_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Font family -> utility class
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct FontMap(BTreeMap<String, String>);

impl FontMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, family: impl Into<String>, class: impl Into<String>) -> Self {
        self.0.insert(family.into(), class.into());
        self
    }

    /// Resolve a family to its class, tolerating case differences
    pub fn class_for(&self, family: &str) -> Option<&str> {
        self.0.get(family).map(String::as_str).or_else(|| {
            self.0
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(family))
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantics_from_json() {
        let map: SemanticsMap = serde_json::from_str(
            r#"{"1:2": {"tag": "NAV"}, "1:3": {"label": "Book now", "href": "/book"}}"#,
        )
        .unwrap();
        assert_eq!(map.tag("1:2").as_deref(), Some("nav"));
        assert_eq!(map.label("1:3"), Some("Book now"));
        assert_eq!(map.href("1:3"), Some("/book"));
        assert_eq!(map.tag("missing"), None);
    }

    #[test]
    fn test_malformed_tag_and_blank_role_are_ignored() {
        let map: SemanticsMap = serde_json::from_str(
            r#"{"a": {"tag": "<script>", "role": "  "}, "b": {"tag": "my-card", "role": "banner"}}"#,
        )
        .unwrap();
        assert_eq!(map.tag("a"), None);
        assert_eq!(map.role("a"), None);
        assert_eq!(map.tag("b").as_deref(), Some("my-card"));
        assert_eq!(map.role("b"), Some("banner"));
    }

    #[test]
    fn test_font_map_case_insensitive() {
        let fonts = FontMap::new().with_family("Inter", "font-inter");
        assert_eq!(fonts.class_for("Inter"), Some("font-inter"));
        assert_eq!(fonts.class_for("inter"), Some("font-inter"));
        assert_eq!(fonts.class_for("Roboto"), None);
    }
}
