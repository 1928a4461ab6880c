//! Recursive tree-to-markup compiler

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, trace};

use crate::design::{DesignNode, FontMap, Paint, ScaleMode, SemanticsMap};
use crate::markup::classes::ClassList;
use crate::markup::parser::VOID_TAGS;

use super::background::partition;
use super::builder::{Element, HtmlBuilder};
use super::config::{Heuristics, InferenceConfig};
use super::decoration::{decoration_classes, dominant_fill, image_placeholder, paint_classes};
use super::error::InferenceError;
use super::grid::{grid_cols_for, should_use_grid};
use super::interactive::{control_for, resolve_label, Control};
use super::sizing::{flex_classes, grid_classes, padding_classes, resolve_intents, sizing_classes, AxisIntents};
use super::typography::text_classes;

/// Key of the document root element
pub const ROOT_KEY: &str = "root";

/// Compiles a design tree into utility-class markup
pub struct InferenceEngine<'a> {
    config: InferenceConfig,
    heuristics: Heuristics,
    semantics: &'a SemanticsMap,
    fonts: &'a FontMap,
}

/// Where a node sits in the tree being rendered
#[derive(Clone, Copy)]
struct Placement<'n, 'k> {
    parent: Option<&'n DesignNode>,
    parent_is_grid: bool,
    key: &'k str,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(
        config: InferenceConfig,
        semantics: &'a SemanticsMap,
        fonts: &'a FontMap,
    ) -> Result<Self, InferenceError> {
        let heuristics = config.heuristics()?;
        Ok(Self {
            config,
            heuristics,
            semantics,
            fonts,
        })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Render the tree rooted at `root`
    pub fn render(&self, root: Option<&DesignNode>) -> Result<String, InferenceError> {
        let root = root.ok_or(InferenceError::MissingTree)?;
        let mut out = HtmlBuilder::new(self.config.pretty_print);
        let placement = Placement {
            parent: None,
            parent_is_grid: false,
            key: ROOT_KEY,
        };
        self.render_node(root, placement, &mut out);
        Ok(out.finish())
    }

    fn control(&self, node: &DesignNode) -> Option<Control> {
        control_for(node, self.semantics, &self.config, &self.heuristics)
    }

    fn element(&self, tag: &str, node: &DesignNode, key: &str, intents: AxisIntents) -> Element {
        let mut element = Element::new(tag)
            .attr("data-node", node.id.as_str())
            .attr("data-key", key)
            .attr("data-w-intent", intents.width.as_str())
            .attr("data-h-intent", intents.height.as_str());
        if let Some(role) = self.semantics.role(&node.id) {
            element = element.attr("role", role);
        }
        if self.config.debug_attributes {
            element = element.attr("data-name", node.name.as_str());
        }
        element
    }

    fn heading_tag(&self, name: &str) -> Option<String> {
        let level = self.heuristics.heading_name.captures(name)?.get(1)?;
        Some(format!("h{}", level.as_str()))
    }

    fn render_node(&self, node: &DesignNode, at: Placement<'_, '_>, out: &mut HtmlBuilder) {
        trace!(node = %node.id, key = at.key, "render");
        let intents = resolve_intents(node, at.parent);
        let sizing = sizing_classes(node, intents, at.parent, at.parent_is_grid);
        let semantic_tag = self.semantics.tag(&node.id);

        // Vector payloads and vector-kind drawings
        if let Some(svg) = &node.svg {
            let src = format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg));
            let mut classes = sizing;
            classes.extend(decoration_classes(node));
            let element = self
                .element("img", node, at.key, intents)
                .attr("src", src)
                .attr("alt", "")
                .with_classes(classes);
            out.void(&element);
            return;
        }
        if node.kind.is_vector() {
            let mut classes = sizing;
            if let Some(paint) = dominant_fill(node) {
                classes.extend(paint_classes(paint, node, &self.config.placeholder_host));
            }
            classes.extend(decoration_classes(node));
            let element = self
                .element("div", node, at.key, intents)
                .attr("aria-hidden", "true")
                .with_classes(classes);
            out.open(&element);
            out.close("div");
            return;
        }

        // Text, unless overridden into a control
        if let Some(text) = &node.text {
            if !matches!(semantic_tag.as_deref(), Some("a") | Some("button")) {
                // Text needs a closing tag
                let tag = semantic_tag
                    .filter(|t| !is_void(t))
                    .or_else(|| self.heading_tag(&node.name))
                    .unwrap_or_else(|| "p".to_string());
                let mut classes = sizing;
                classes.extend(text_classes(text, &node.fills, self.fonts));
                classes.extend(decoration_classes(node));
                let element = self.element(&tag, node, at.key, intents).with_classes(classes);
                out.leaf(&element, &text.characters);
                return;
            }
        }

        if let Some(control) = self.control(node) {
            self.render_control(node, control, intents, sizing, at, out);
            return;
        }

        // Image leaf
        if let Some(Paint::Image { src, scale_mode, .. }) = node.image_fill() {
            if node.children.is_empty() {
                let src = match src {
                    Some(src) if !src.is_empty() => src.clone(),
                    _ => image_placeholder(node, &self.config.placeholder_host),
                };
                let alt = self
                    .semantics
                    .get(&node.id)
                    .and_then(|o| o.alt.clone())
                    .unwrap_or_default();
                let mut classes = sizing;
                classes.push(match scale_mode {
                    ScaleMode::Fit => "object-contain",
                    _ => "object-cover",
                });
                classes.extend(decoration_classes(node));
                let element = self
                    .element("img", node, at.key, intents)
                    .attr("src", src)
                    .attr("alt", alt)
                    .with_classes(classes);
                out.void(&element);
                return;
            }
        }

        self.render_container(node, semantic_tag, intents, sizing, at, out);
    }

    fn render_container(
        &self,
        node: &DesignNode,
        semantic_tag: Option<String>,
        intents: AxisIntents,
        sizing: ClassList,
        at: Placement<'_, '_>,
        out: &mut HtmlBuilder,
    ) {
        let parts = partition(node, &self.config, &self.heuristics);
        let use_grid = should_use_grid(node, &parts.flow, &self.config, &self.heuristics, |c| {
            self.control(c).is_some()
        });
        debug!(
            node = %node.id,
            grid = use_grid,
            flow = parts.flow.len(),
            suppressed = parts.suppressed.len(),
            "container model"
        );

        let mut classes = if use_grid {
            let cols = grid_cols_for(node, parts.flow.len(), &self.heuristics);
            grid_classes(node.auto.as_ref(), cols)
        } else if let Some(auto) = &node.auto {
            flex_classes(auto)
        } else if !parts.flow.is_empty() {
            ClassList::from_iter(["relative"])
        } else {
            ClassList::new()
        };
        classes.extend(sizing);

        let backdrop = parts.hoisted.or_else(|| dominant_fill(node));
        if let Some(paint) = backdrop {
            classes.extend(paint_classes(paint, node, &self.config.placeholder_host));
        }
        classes.extend(decoration_classes(node));

        // A void override only fits a container with nothing to render inside
        let void_tag = semantic_tag.as_deref().is_some_and(is_void);
        if void_tag && parts.flow.is_empty() {
            let tag = semantic_tag.unwrap_or_default();
            out.void(&self.element(&tag, node, at.key, intents).with_classes(classes));
            return;
        }
        let tag = semantic_tag.filter(|_| !void_tag).unwrap_or_else(|| {
            if at.parent.is_none() {
                "section".to_string()
            } else {
                "div".to_string()
            }
        });
        let element = self.element(&tag, node, at.key, intents).with_classes(classes);
        out.open(&element);
        self.render_children(node, &parts.flow, use_grid, at.key, out);
        out.close(&tag);
    }

    fn render_control(
        &self,
        node: &DesignNode,
        control: Control,
        intents: AxisIntents,
        sizing: ClassList,
        at: Placement<'_, '_>,
        out: &mut HtmlBuilder,
    ) {
        let mut classes: ClassList = ["inline-flex", "items-center", "justify-center"]
            .into_iter()
            .collect();
        classes.extend(sizing);
        if let Some(auto) = &node.auto {
            if auto.item_spacing > 0.0 {
                classes.extend(
                    flex_classes(auto)
                        .iter()
                        .filter(|t| t.family() == "gap")
                        .map(|t| t.raw.to_string()),
                );
            }
            classes.extend(padding_classes(&auto.padding));
        }
        if !node.is_text() {
            if let Some(paint) = dominant_fill(node) {
                classes.extend(paint_classes(paint, node, &self.config.placeholder_host));
            }
        }
        classes.extend(decoration_classes(node));

        let label_node = if node.is_text() {
            Some(node)
        } else {
            node.first_descendant_text()
        };
        if let Some(source) = label_node {
            if let Some(payload) = &source.text {
                classes.extend(text_classes(payload, &source.fills, self.fonts));
            }
        }

        let tag = control.tag();
        let element = match &control {
            Control::Link { href } => self.element(tag, node, at.key, intents).attr("href", href.as_str()),
            Control::Button => self.element(tag, node, at.key, intents).attr("type", "button"),
        }
        .with_classes(classes);

        match resolve_label(node, self.semantics) {
            Some(label) => out.leaf(&element, &label),
            None => {
                let flow: Vec<&DesignNode> = node.children.iter().collect();
                out.open(&element);
                self.render_children(node, &flow, false, at.key, out);
                out.close(tag);
            }
        }
    }

    fn render_children(
        &self,
        node: &DesignNode,
        flow: &[&DesignNode],
        is_grid: bool,
        key: &str,
        out: &mut HtmlBuilder,
    ) {
        let mut used = HashSet::new();
        for child in flow {
            let slug = slugify(&child.name);
            let mut candidate = slug.clone();
            let mut n = 1;
            while used.contains(&candidate) {
                n += 1;
                candidate = format!("{}-{}", slug, n);
            }
            used.insert(candidate.clone());

            let child_key = if key == ROOT_KEY {
                candidate
            } else {
                format!("{}/{}", key, candidate)
            };
            let placement = Placement {
                parent: Some(node),
                parent_is_grid: is_grid,
                key: &child_key,
            };
            self.render_node(child, placement, out);
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Lowercase ASCII slug of a node name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "node".to_string()
    } else {
        slug
    }
}
