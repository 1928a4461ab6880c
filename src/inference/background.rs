//! Background suppression: decorative siblings leave the flow and their
//! image or gradient paint is hoisted onto the parent

use tracing::debug;

use crate::design::{DesignNode, NodeKind, Paint};

use super::config::{Heuristics, InferenceConfig};

/// Why a child was taken out of flow rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Name marks it as a background, overlay, or gradient
    Named,
    /// Image or gradient covering most of the parent, without text
    Covering,
    /// Solid rectangle under a parent that is itself a background image
    SolidUnderImage,
}

/// Children of one container split into flow and background
#[derive(Debug, Default)]
pub struct Partition<'n> {
    pub flow: Vec<&'n DesignNode>,
    pub suppressed: Vec<(&'n DesignNode, Suppression)>,
    /// Paint to render as the parent's background
    pub hoisted: Option<&'n Paint>,
}

fn backdrop_paint(node: &DesignNode) -> Option<&Paint> {
    node.visible_fills()
        .rev()
        .find(|p| matches!(p, Paint::Gradient { .. }))
        .or_else(|| node.image_fill())
}

fn covers(child: &DesignNode, parent: &DesignNode, ratio: f64) -> bool {
    match (child.width(), child.height(), parent.width(), parent.height()) {
        (Some(cw), Some(ch), Some(pw), Some(ph)) if pw > 0.0 && ph > 0.0 => {
            cw / pw >= ratio && ch / ph >= ratio
        }
        _ => false,
    }
}

/// Classify one child of `parent`
pub fn suppression(
    child: &DesignNode,
    parent: &DesignNode,
    config: &InferenceConfig,
    heuristics: &Heuristics,
) -> Option<Suppression> {
    if heuristics.is_background_name(&child.name) {
        return Some(Suppression::Named);
    }
    if backdrop_paint(child).is_some()
        && !child.contains_text()
        && covers(child, parent, config.background_cover_ratio)
    {
        return Some(Suppression::Covering);
    }
    if heuristics.background_parent.is_match(&parent.name)
        && matches!(child.kind, NodeKind::Rectangle)
        && child.has_only_solid_fills()
    {
        return Some(Suppression::SolidUnderImage);
    }
    None
}

/// Split the children of `parent`. Only the first suppressed image or
/// gradient is hoisted, and only when the parent has no backdrop of its own.
pub fn partition<'n>(
    parent: &'n DesignNode,
    config: &InferenceConfig,
    heuristics: &Heuristics,
) -> Partition<'n> {
    let mut out = Partition::default();
    for child in &parent.children {
        match suppression(child, parent, config, heuristics) {
            Some(reason) => {
                debug!(parent = %parent.id, child = %child.id, ?reason, "suppressed background sibling");
                if out.hoisted.is_none() && reason != Suppression::SolidUnderImage {
                    out.hoisted = backdrop_paint(child);
                }
                out.suppressed.push((child, reason));
            }
            None => out.flow.push(child),
        }
    }
    if backdrop_paint(parent).is_some() {
        out.hoisted = None;
    }
    out
}
