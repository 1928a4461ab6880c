//! Flat element IR built from the tag scanner with an explicit open-tag stack

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MarkupError, Span};

use super::classes::ClassList;
use super::lexer::{scan, MarkupToken};

/// Elements that never have a closing tag
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose box is replaced content
pub const MEDIA_TAGS: &[&str] = &["img", "video", "picture", "svg", "iframe", "canvas"];

/// Elements that carry running text
pub const TEXT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "label", "li", "blockquote", "strong", "em",
    "small",
];

static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</?([A-Za-z][A-Za-z0-9-]*)").expect("tag name pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag strip pattern is valid"));

/// One element of the parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    pub tag: String,
    pub open_start: usize,
    pub open_end: usize,
    /// Equal to `open_end` for void and self-closing elements
    pub close_start: usize,
    pub close_end: usize,
    pub attrs: HashMap<String, String>,
    pub attr_order: Vec<String>,
    pub parent_index: Option<usize>,
    pub is_self_closing: bool,
    /// The open tag was written with a trailing `/>`
    pub slash_close: bool,
}

impl ParsedNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn classes(&self) -> ClassList {
        ClassList::parse(self.attr("class").unwrap_or(""))
    }

    pub fn width_intent(&self) -> Option<&str> {
        self.attr("data-w-intent")
    }

    pub fn height_intent(&self) -> Option<&str> {
        self.attr("data-h-intent")
    }

    pub fn is_decorative(&self) -> bool {
        matches!(self.attr("data-decorative"), Some("1") | Some("true"))
    }

    pub fn is_media(&self) -> bool {
        MEDIA_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_text_tag(&self) -> bool {
        TEXT_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.tag.as_str(), "a" | "button")
    }

    /// Carries a background image, either as a utility or inline style
    pub fn has_background_image(&self) -> bool {
        let inline = self
            .attr("style")
            .map(|s| s.contains("background-image") || s.contains("url("))
            .unwrap_or(false);
        inline || self.classes().iter().any(|t| t.is_background_image())
    }

    /// Open tag re-serialized from the current attributes
    pub fn render_open_tag(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for name in &self.attr_order {
            if let Some(value) = self.attrs.get(name) {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
        }
        out.push_str(if self.slash_close { " />" } else { ">" });
        out
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if !self.attrs.contains_key(name) {
            self.attr_order.push(name.to_string());
        }
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) {
        if self.attrs.remove(name).is_some() {
            self.attr_order.retain(|n| n != name);
        }
    }

    /// Replace the class attribute; an empty list drops it
    pub fn set_classes(&mut self, classes: &ClassList) {
        if classes.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", classes.to_string());
        }
    }
}

/// A parsed markup fragment: the source plus its elements in document order
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub source: &'a str,
    pub nodes: Vec<ParsedNode>,
}

impl<'a> Document<'a> {
    /// Parse a balanced-tag fragment
    pub fn parse(source: &'a str) -> Result<Self, MarkupError> {
        let mut nodes: Vec<ParsedNode> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        for (token, span) in scan(source)? {
            match token {
                MarkupToken::OpenTag => {
                    let raw = &source[span.clone()];
                    let node = parse_open_tag(raw, span, stack.last().copied());
                    let index = nodes.len();
                    let open = !node.is_self_closing;
                    nodes.push(node);
                    if open {
                        stack.push(index);
                    }
                }
                MarkupToken::CloseTag => {
                    let raw = &source[span.clone()];
                    let name = tag_name(raw);
                    let Some(top) = stack.pop() else {
                        return Err(MarkupError::UnexpectedClose { tag: name, span });
                    };
                    if nodes[top].tag != name {
                        return Err(MarkupError::MismatchedClose {
                            expected: nodes[top].tag.clone(),
                            found: name,
                            span,
                        });
                    }
                    nodes[top].close_start = span.start;
                    nodes[top].close_end = span.end;
                }
                MarkupToken::Comment | MarkupToken::Doctype | MarkupToken::Text => {}
            }
        }

        if let Some(open) = stack.pop() {
            let node = &nodes[open];
            return Err(MarkupError::Unclosed {
                tag: node.tag.clone(),
                span: node.open_start..node.open_end,
            });
        }

        Ok(Self { source, nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &ParsedNode {
        &self.nodes[index]
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes[index].parent_index
    }

    /// Direct element children in document order
    pub fn children(&self, index: usize) -> Vec<usize> {
        self.descendants(index)
            .filter(|&j| self.nodes[j].parent_index == Some(index))
            .collect()
    }

    /// All element descendants; they are contiguous after `index`
    pub fn descendants(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let end = self.nodes[index].close_start;
        ((index + 1)..self.nodes.len()).take_while(move |&j| self.nodes[j].open_start < end)
    }

    /// Ancestors from the parent up to the top-level element
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.nodes[index].parent_index, move |&p| {
            self.nodes[p].parent_index
        })
    }

    /// Number of ancestors
    pub fn depth(&self, index: usize) -> usize {
        self.ancestors(index).count()
    }

    pub fn has_element_children(&self, index: usize) -> bool {
        self.descendants(index).next().is_some()
    }

    /// Raw markup between the open and close tags
    pub fn inner_html(&self, index: usize) -> &'a str {
        let node = &self.nodes[index];
        &self.source[node.open_end..node.close_start]
    }

    /// Span of the inner markup
    pub fn inner_span(&self, index: usize) -> Span {
        let node = &self.nodes[index];
        node.open_end..node.close_start
    }

    /// Text content with tags stripped, entities decoded, and whitespace collapsed
    pub fn text_content(&self, index: usize) -> String {
        let stripped = TAG.replace_all(self.inner_html(index), " ");
        let decoded = decode_entities(&stripped);
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// A leaf with visible text and no element children
    pub fn is_text_leaf(&self, index: usize) -> bool {
        !self.nodes[index].is_self_closing
            && !self.has_element_children(index)
            && !self.inner_html(index).trim().is_empty()
    }

    /// Human-readable identity for reports: `data-node`, else `tag#index`
    pub fn label(&self, index: usize) -> String {
        let node = &self.nodes[index];
        match node.attr("data-node") {
            Some(id) => id.to_string(),
            None => format!("{}#{}", node.tag, index),
        }
    }
}

fn tag_name(raw: &str) -> String {
    TAG_NAME
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default()
}

fn parse_open_tag(raw: &str, span: Span, parent_index: Option<usize>) -> ParsedNode {
    let tag = tag_name(raw);
    let name_end = 1 + tag.len();
    let slash_close = raw.trim_end_matches('>').trim_end().ends_with('/');
    let body = raw[name_end..].trim_end_matches('>').trim_end_matches('/');

    let mut attrs = HashMap::new();
    let mut attr_order = Vec::new();
    for cap in ATTRIBUTE.captures_iter(body) {
        let Some(name) = cap.get(1) else { continue };
        let name = name.as_str().to_ascii_lowercase();
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map(|m| decode_entities(m.as_str()))
            .unwrap_or_default();
        if !attrs.contains_key(&name) {
            attr_order.push(name.clone());
            attrs.insert(name, value);
        }
    }

    let is_self_closing = slash_close || VOID_TAGS.contains(&tag.as_str());
    ParsedNode {
        tag,
        open_start: span.start,
        open_end: span.end,
        close_start: span.end,
        close_end: span.end,
        attrs,
        attr_order,
        parent_index,
        is_self_closing,
        slash_close,
    }
}

/// Escape a value for a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape running text
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Decode the entities this crate emits
pub fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_with_parent_indices() {
        let html = r#"<section class="a"><div><p>Hi</p></div><img src="x.png"></section>"#;
        let doc = Document::parse(html).unwrap();
        let tags: Vec<_> = doc.nodes.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["section", "div", "p", "img"]);
        assert_eq!(doc.parent(0), None);
        assert_eq!(doc.parent(1), Some(0));
        assert_eq!(doc.parent(2), Some(1));
        assert_eq!(doc.parent(3), Some(0));
        assert!(doc.node(3).is_self_closing);
        assert_eq!(doc.children(0), vec![1, 3]);
        assert_eq!(doc.descendants(0).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(doc.ancestors(2).collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn test_spans_do_not_overlap() {
        let html = "<div><span>a</span><span>b</span></div>";
        let doc = Document::parse(html).unwrap();
        let first = doc.node(1);
        let second = doc.node(2);
        assert!(first.close_end <= second.open_start);
        assert_eq!(&html[first.open_start..first.close_end], "<span>a</span>");
        assert_eq!(doc.inner_html(2), "b");
    }

    #[test]
    fn test_attribute_order_and_decoding() {
        let html = r#"<div data-node="1:2" class="[[data-bucket=&quot;mobile&quot;]_&amp;]:flex-row" hidden></div>"#;
        let doc = Document::parse(html).unwrap();
        let node = doc.node(0);
        assert_eq!(node.attr_order, vec!["data-node", "class", "hidden"]);
        assert_eq!(
            node.attr("class"),
            Some(r#"[[data-bucket="mobile"]_&]:flex-row"#)
        );
        assert_eq!(node.attr("hidden"), Some(""));
    }

    #[test]
    fn test_render_open_tag_round_trips_escaping() {
        let html = r#"<div class="[[data-bucket=&quot;mobile&quot;]_&amp;]:flex-row" hidden=""></div>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(
            doc.node(0).render_open_tag(),
            r#"<div class="[[data-bucket=&quot;mobile&quot;]_&amp;]:flex-row" hidden="">"#
        );
    }

    #[test]
    fn test_text_content_collapses_whitespace() {
        let html = "<div>\n  <h2>Book   <em>now</em></h2>\n</div>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.text_content(0), "Book now");
        assert!(!doc.is_text_leaf(0));
        assert!(doc.is_text_leaf(2));
    }

    #[test]
    fn test_mismatched_close_is_error() {
        let err = Document::parse("<div><p></div>").unwrap_err();
        assert!(matches!(err, MarkupError::MismatchedClose { .. }));
    }

    #[test]
    fn test_unclosed_is_error() {
        let err = Document::parse("<div><p></p>").unwrap_err();
        assert!(matches!(err, MarkupError::Unclosed { .. }));
    }

    #[test]
    fn test_unexpected_close_is_error() {
        let err = Document::parse("</div>").unwrap_err();
        assert!(matches!(err, MarkupError::UnexpectedClose { .. }));
    }

    #[test]
    fn test_self_closing_syntax_preserved() {
        let doc = Document::parse(r#"<img src="a.png" />"#).unwrap();
        assert!(doc.node(0).slash_close);
        assert_eq!(doc.node(0).render_open_tag(), r#"<img src="a.png" />"#);
    }
}
