//! Height policy keyed off `data-h-intent`

use crate::inference::Intent;
use crate::markup::ClassList;

use super::error::ContractError;
use super::pipeline::{rewrite, Artifact, Contract, ContractContext, ContractOutput};

fn hug(classes: &mut ClassList) {
    classes.retain(|t| !t.is_height());
}

fn fill(classes: &mut ClassList) {
    let at = classes.retain(|t| !t.is_height() || (t.is_unprefixed() && t.base == "h-full"));
    match at {
        Some(at) => classes.ensure_at(at, "h-full"),
        None => classes.ensure("h-full"),
    };
}

/// Keep the last unprefixed literal height; returns its final index
fn keep_one_literal(classes: &mut ClassList) -> Option<usize> {
    let keep = classes.last_position(|t| t.is_unprefixed() && t.is_literal_height())?;
    let token = classes.as_slice()[keep].clone();
    classes.retain_indexed(|i, t| i == keep || !(t.is_unprefixed() && t.is_height()));
    classes.position(&token)
}

fn fixed(classes: &mut ClassList, is_media: bool) {
    if keep_one_literal(classes).is_some() && is_media {
        classes.ensure("max-md:h-auto");
    }
}

/// The document root is fluid below `md` and fixed above it
fn fixed_root(classes: &mut ClassList) {
    let converted = classes.has_base("h-auto")
        && classes
            .iter()
            .any(|t| t.variant == "md" && t.is_literal_height());
    if converted {
        return;
    }
    if let Some(at) = keep_one_literal(classes) {
        let literal = classes.as_slice()[at].clone();
        classes.replace_at(at, "h-auto");
        classes.ensure_at(at + 1, format!("md:{}", literal));
    }
}

/// hug: no height utility; fill: exactly `h-full`; fixed: one literal height
pub struct Heights;

impl Contract for Heights {
    fn name(&self) -> &'static str {
        "heights"
    }

    fn order(&self) -> u32 {
        70
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::HeightIntent, Artifact::Decorative, Artifact::Tag]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            let doc = rw.doc();
            for i in 0..doc.len() {
                let node = rw.node(i);
                if node.is_decorative() {
                    continue;
                }
                let Some(intent) = node.height_intent().and_then(Intent::parse) else {
                    continue;
                };
                let is_media = node.is_media();
                let is_root = doc.parent(i).is_none();
                rw.update_classes(i, |c| match intent {
                    Intent::Hug => hug(c),
                    Intent::Fill => fill(c),
                    Intent::Fixed if is_root => fixed_root(c),
                    Intent::Fixed => fixed(c, is_media),
                });
            }
        })
    }
}
