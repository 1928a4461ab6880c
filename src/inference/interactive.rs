//! Buttons and links synthesized from design nodes

use crate::design::{DesignNode, LayoutMode, SemanticsMap};

use super::config::{Heuristics, InferenceConfig};

/// A node that renders as a native control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Button,
    Link { href: String },
}

impl Control {
    pub fn tag(&self) -> &'static str {
        match self {
            Control::Button => "button",
            Control::Link { .. } => "a",
        }
    }
}

fn href_for(node: &DesignNode, semantics: &SemanticsMap) -> String {
    semantics
        .href(&node.id)
        .map(str::to_string)
        .or_else(|| node.action.as_ref().and_then(|a| a.open_url.clone()))
        .unwrap_or_else(|| "#".to_string())
}

fn has_direct_text_child(node: &DesignNode) -> bool {
    node.children.iter().any(DesignNode::is_text)
}

/// Decide whether a node is a control: semantics override, then name hint,
/// then the structural shape of a button
pub fn control_for(
    node: &DesignNode,
    semantics: &SemanticsMap,
    config: &InferenceConfig,
    heuristics: &Heuristics,
) -> Option<Control> {
    if let Some(tag) = semantics.tag(&node.id) {
        return match tag.as_str() {
            "a" => Some(Control::Link {
                href: href_for(node, semantics),
            }),
            "button" => Some(Control::Button),
            _ => None,
        };
    }

    if node.is_text() || node.is_media() {
        return None;
    }

    let compact = node.text_descendant_count() <= config.max_control_texts
        && !node.children.iter().any(DesignNode::contains_media);
    if compact && heuristics.link_name.is_match(&node.name) {
        return Some(Control::Link {
            href: href_for(node, semantics),
        });
    }
    if compact && heuristics.button_name.is_match(&node.name) {
        return Some(link_or_button(node, semantics));
    }

    let clickable = node.action.as_ref().map(|a| a.is_signal()).unwrap_or(false);
    let structural = node.layout_mode() != LayoutMode::None
        && clickable
        && has_direct_text_child(node)
        && node.visible_fills().next().is_some();
    structural.then(|| link_or_button(node, semantics))
}

fn link_or_button(node: &DesignNode, semantics: &SemanticsMap) -> Control {
    let has_url = semantics.href(&node.id).is_some()
        || node
            .action
            .as_ref()
            .map(|a| a.open_url.is_some())
            .unwrap_or(false);
    if has_url {
        Control::Link {
            href: href_for(node, semantics),
        }
    } else {
        Control::Button
    }
}

/// Resolve a control's visible label. The node's own name is never used.
pub fn resolve_label(node: &DesignNode, semantics: &SemanticsMap) -> Option<String> {
    if let Some(label) = semantics.label(&node.id) {
        return Some(label.trim().to_string());
    }
    if let Some(instance) = &node.instance {
        if let Some(label) = instance.cta_label.as_deref().filter(|l| !l.trim().is_empty()) {
            return Some(label.trim().to_string());
        }
        let runs: Vec<&str> = instance
            .text_runs
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        if !runs.is_empty() {
            return Some(runs.join(" "));
        }
    }
    if let Some(text) = &node.text {
        if !text.characters.trim().is_empty() {
            return Some(text.characters.trim().to_string());
        }
    }
    node.first_descendant_text()
        .and_then(|n| n.text.as_ref())
        .map(|t| t.characters.trim().to_string())
}
