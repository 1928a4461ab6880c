//! Incremental markup output

use crate::markup::classes::ClassList;
use crate::markup::parser::{escape_attribute, escape_text};

/// An element about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub classes: ClassList,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: vec![],
            classes: ClassList::new(),
        }
    }

    /// Set an attribute, replacing an earlier value of the same name
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn with_classes(mut self, classes: ClassList) -> Self {
        self.classes = classes;
        self
    }

    fn open_tag(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            out.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(
                r#" class="{}""#,
                escape_attribute(&self.classes.to_string())
            ));
        }
        out.push('>');
        out
    }
}

/// Build markup elements incrementally
pub struct HtmlBuilder {
    pretty_print: bool,
    indent: usize,
    out: String,
}

impl HtmlBuilder {
    pub fn new(pretty_print: bool) -> Self {
        Self {
            pretty_print,
            indent: 0,
            out: String::new(),
        }
    }

    fn line_start(&mut self) {
        if self.pretty_print {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.push_str(&"  ".repeat(self.indent));
        }
    }

    /// Open a container element; children follow until `close`
    pub fn open(&mut self, element: &Element) {
        self.line_start();
        self.out.push_str(&element.open_tag());
        self.indent += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line_start();
        self.out.push_str(&format!("</{}>", tag));
    }

    /// An element whose only content is text
    pub fn leaf(&mut self, element: &Element, text: &str) {
        self.line_start();
        self.out.push_str(&element.open_tag());
        self.out.push_str(&escape_text(text));
        self.out.push_str(&format!("</{}>", element.tag));
    }

    /// A void element such as `<img>`
    pub fn void(&mut self, element: &Element) {
        self.line_start();
        self.out.push_str(&element.open_tag());
    }

    /// Markup that is already rendered, written as one child
    pub fn raw(&mut self, html: &str) {
        self.line_start();
        self.out.push_str(html.trim());
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_nesting() {
        let mut builder = HtmlBuilder::new(true);
        builder.open(&Element::new("section").attr("data-key", "root"));
        builder.leaf(
            &Element::new("p").with_classes(ClassList::parse("text-[16px]")),
            "Fish & chips",
        );
        builder.void(&Element::new("img").attr("src", "a.png").attr("alt", ""));
        builder.close("section");
        assert_eq!(
            builder.finish(),
            "<section data-key=\"root\">\n  <p class=\"text-[16px]\">Fish &amp; chips</p>\n  <img src=\"a.png\" alt=\"\">\n</section>"
        );
    }

    #[test]
    fn test_compact_output() {
        let mut builder = HtmlBuilder::new(false);
        builder.open(&Element::new("div"));
        builder.leaf(&Element::new("span"), "x");
        builder.close("div");
        assert_eq!(builder.finish(), "<div><span>x</span></div>");
    }

    #[test]
    fn test_raw_child() {
        let mut builder = HtmlBuilder::new(true);
        builder.open(&Element::new("div"));
        builder.raw("<p>x</p>\n");
        builder.close("div");
        assert_eq!(builder.finish(), "<div>\n  <p>x</p>\n</div>");
    }

    #[test]
    fn test_attr_replaces_existing() {
        let el = Element::new("a").attr("href", "#").attr("href", "/book");
        assert_eq!(el.attrs, vec![("href".to_string(), "/book".to_string())]);
    }
}
