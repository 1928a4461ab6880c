//! Copy-on-write element edits that collapse into non-overlapping patches

use std::collections::BTreeMap;

use crate::error::MarkupError;

use super::classes::ClassList;
use super::parser::{Document, ParsedNode};
use super::patch::{apply_patches, Patch};

/// Collects edits against one parsed document
pub struct Rewriter<'d, 'a> {
    doc: &'d Document<'a>,
    elements: BTreeMap<usize, ParsedNode>,
    inner: BTreeMap<usize, String>,
}

/// Result of flushing a rewriter
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub html: String,
    /// Indices of elements whose markup actually changed
    pub changed: Vec<usize>,
}

impl<'d, 'a> Rewriter<'d, 'a> {
    pub fn new(doc: &'d Document<'a>) -> Self {
        Self {
            doc,
            elements: BTreeMap::new(),
            inner: BTreeMap::new(),
        }
    }

    pub fn doc(&self) -> &'d Document<'a> {
        self.doc
    }

    /// Current view of an element, including pending edits
    pub fn node(&self, index: usize) -> &ParsedNode {
        self.elements
            .get(&index)
            .unwrap_or_else(|| self.doc.node(index))
    }

    fn node_mut(&mut self, index: usize) -> &mut ParsedNode {
        let doc = self.doc;
        self.elements
            .entry(index)
            .or_insert_with(|| doc.node(index).clone())
    }

    pub fn classes(&self, index: usize) -> ClassList {
        self.node(index).classes()
    }

    pub fn set_classes(&mut self, index: usize, classes: &ClassList) {
        if &self.classes(index) != classes {
            self.node_mut(index).set_classes(classes);
        }
    }

    /// Edit the class list in place
    pub fn update_classes(&mut self, index: usize, edit: impl FnOnce(&mut ClassList)) {
        let mut classes = self.classes(index);
        edit(&mut classes);
        self.set_classes(index, &classes);
    }

    pub fn set_attr(&mut self, index: usize, name: &str, value: &str) {
        if self.node(index).attr(name) != Some(value) {
            self.node_mut(index).set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, index: usize, name: &str) {
        if self.node(index).has_attr(name) {
            self.node_mut(index).remove_attr(name);
        }
    }

    pub fn rename(&mut self, index: usize, tag: &str) {
        if self.node(index).tag != tag {
            self.node_mut(index).tag = tag.to_string();
        }
    }

    /// Replace the raw inner markup of a non-void element
    pub fn set_inner_html(&mut self, index: usize, html: impl Into<String>) {
        let html = html.into();
        if self.doc.inner_html(index) != html {
            self.inner.insert(index, html);
        }
    }

    /// Build patches for every element that differs from the source
    pub fn finish(self) -> Result<Rewritten, MarkupError> {
        let mut patches = Vec::new();
        let mut changed = Vec::new();

        for (&index, edited) in &self.elements {
            let original = self.doc.node(index);
            let attrs_changed = edited.attrs != original.attrs
                || edited.attr_order != original.attr_order;
            let tag_changed = edited.tag != original.tag;
            if !attrs_changed && !tag_changed {
                continue;
            }
            patches.push(Patch::new(
                original.open_start,
                original.open_end,
                edited.render_open_tag(),
            ));
            if tag_changed && !original.is_self_closing {
                patches.push(Patch::new(
                    original.close_start,
                    original.close_end,
                    format!("</{}>", edited.tag),
                ));
            }
            changed.push(index);
        }

        for (&index, html) in &self.inner {
            let span = self.doc.inner_span(index);
            patches.push(Patch::new(span.start, span.end, html.clone()));
            if !changed.contains(&index) {
                changed.push(index);
            }
        }

        changed.sort_unstable();
        let html = apply_patches(self.doc.source, patches)?;
        Ok(Rewritten { html, changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_document_is_byte_identical() {
        let html = r#"<div  class="a   b"><p>x</p></div>"#;
        let doc = Document::parse(html).unwrap();
        let mut rw = Rewriter::new(&doc);
        rw.update_classes(0, |c| {
            c.ensure("a");
        });
        let out = rw.finish().unwrap();
        assert_eq!(out.html, html);
        assert!(out.changed.is_empty());
    }

    #[test]
    fn test_rename_patches_both_tags() {
        let html = r#"<div data-href="/x"><span>Go</span></div>"#;
        let doc = Document::parse(html).unwrap();
        let mut rw = Rewriter::new(&doc);
        rw.rename(0, "a");
        rw.remove_attr(0, "data-href");
        rw.set_attr(0, "href", "/x");
        let out = rw.finish().unwrap();
        assert_eq!(out.html, r#"<a href="/x"><span>Go</span></a>"#);
        assert_eq!(out.changed, vec![0]);
    }

    #[test]
    fn test_inner_and_nested_edits() {
        let html = r#"<div class="a"><p class="b">x &amp;amp; y</p></div>"#;
        let doc = Document::parse(html).unwrap();
        let mut rw = Rewriter::new(&doc);
        rw.update_classes(0, |c| c.push("c"));
        rw.set_inner_html(1, "x &amp; y");
        let out = rw.finish().unwrap();
        assert_eq!(out.html, r#"<div class="a c"><p class="b">x &amp; y</p></div>"#);
        assert_eq!(out.changed, vec![0, 1]);
    }
}
