//! Merge-or-swap decision for a set of viewport fragments

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::markup::{Document, ParsedNode};

use super::config::ReconcileConfig;
use super::error::ReconcileError;
use super::keys::primary_keys;
use super::{parse_fragment, ResponsiveFragments, Viewport};

const LANDMARKS: &[&str] = &["header", "nav", "main", "footer", "aside", "section", "form"];
const IMAGES: &[&str] = &["img", "picture", "svg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fewer than two fragments
    Single,
    /// One DOM with bucket-prefixed class overrides
    Merge,
    /// Independent fragments selected per viewport
    Swap,
}

/// How one non-base fragment compares to the base
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantScore {
    pub viewport: Viewport,
    /// Shared keys over the larger key set
    pub overlap: f64,
    /// Longest common subsequence of the shared keys over their count
    pub order: f64,
    /// Structural counts that differ from the base
    pub hard_fails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyDecision {
    pub strategy: Strategy,
    pub base: Option<Viewport>,
    pub scores: Vec<VariantScore>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StructureCounts {
    landmarks: usize,
    buttons: usize,
    links: usize,
    images: usize,
}

fn count(doc: &Document<'_>, pred: impl Fn(&ParsedNode) -> bool) -> usize {
    doc.nodes.iter().filter(|n| pred(n)).count()
}

impl StructureCounts {
    fn of(doc: &Document<'_>) -> Self {
        Self {
            landmarks: count(doc, |n| LANDMARKS.contains(&n.tag.as_str())),
            buttons: count(doc, |n| n.tag == "button" || n.attr("role") == Some("button")),
            links: count(doc, |n| n.tag == "a"),
            images: count(doc, |n| IMAGES.contains(&n.tag.as_str())),
        }
    }

    fn differences(&self, other: &Self) -> Vec<String> {
        [
            ("landmark", self.landmarks, other.landmarks),
            ("button", self.buttons, other.buttons),
            ("link", self.links, other.links),
            ("image", self.images, other.images),
        ]
        .into_iter()
        .filter(|(_, a, b)| a != b)
        .map(|(what, a, b)| format!("{what} count {a} != {b}"))
        .collect()
    }
}

/// Keys in document order, first occurrence only
fn ordered_unique(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

fn lcs_len(a: &[&String], b: &[&String]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                row[j + 1].max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Overlap and order scores of `variant` against `base`
pub fn key_scores(base: &[String], variant: &[String]) -> (f64, f64) {
    let base_set: HashSet<&String> = base.iter().collect();
    let variant_set: HashSet<&String> = variant.iter().collect();
    let common = base_set.intersection(&variant_set).count();
    let larger = base_set.len().max(variant_set.len());
    if common == 0 || larger == 0 {
        return (0.0, 0.0);
    }
    let base_seq: Vec<&String> = base.iter().filter(|k| variant_set.contains(k)).collect();
    let variant_seq: Vec<&String> = variant.iter().filter(|k| base_set.contains(k)).collect();
    let overlap = common as f64 / larger as f64;
    let order = lcs_len(&base_seq, &variant_seq) as f64 / common as f64;
    (overlap, order)
}

/// Decide whether the fragments can share one DOM
pub fn decide_responsive_strategy(
    fragments: &ResponsiveFragments,
    config: &ReconcileConfig,
) -> Result<StrategyDecision, ReconcileError> {
    let present = fragments.present();
    let base = [Viewport::Mobile, Viewport::Tablet, Viewport::Desktop]
        .into_iter()
        .find(|v| fragments.get(*v).is_some());

    let (Some(base), true) = (base, present.len() >= 2) else {
        return Ok(StrategyDecision {
            strategy: Strategy::Single,
            base,
            scores: vec![],
            reasons: vec![format!("{} fragment(s) provided", present.len())],
        });
    };

    let base_html = fragments.get(base).unwrap_or_default();
    let base_doc = parse_fragment(base, base_html)?;
    let base_keys = ordered_unique(primary_keys(&base_doc));
    let base_counts = StructureCounts::of(&base_doc);

    let mut scores = Vec::new();
    for (viewport, html) in present.into_iter().filter(|(v, _)| *v != base) {
        let doc = parse_fragment(viewport, html)?;
        let keys = ordered_unique(primary_keys(&doc));
        let (overlap, order) = key_scores(&base_keys, &keys);
        scores.push(VariantScore {
            viewport,
            overlap,
            order,
            hard_fails: base_counts.differences(&StructureCounts::of(&doc)),
        });
    }

    let mut reasons = Vec::new();
    for score in &scores {
        for fail in &score.hard_fails {
            reasons.push(format!("{}: {}", score.viewport, fail));
        }
        if score.overlap <= config.swap_overlap {
            reasons.push(format!(
                "{}: key overlap {:.3} <= {}",
                score.viewport, score.overlap, config.swap_overlap
            ));
        }
    }

    let strategy = if !reasons.is_empty() {
        Strategy::Swap
    } else if scores
        .iter()
        .all(|s| s.overlap >= config.merge_overlap && s.order >= config.merge_order)
    {
        reasons.push("every variant shares keys and order with the base".to_string());
        Strategy::Merge
    } else {
        reasons.push("variants diverge from the base below merge thresholds".to_string());
        Strategy::Swap
    };

    debug!(?strategy, base = %base, ?scores, "responsive strategy");
    Ok(StrategyDecision {
        strategy,
        base: Some(base),
        scores,
        reasons,
    })
}
