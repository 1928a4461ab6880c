//! Responsive hygiene: section padding, orphaned background positions, and
//! responsive tokens that repeat their base

use crate::markup::{format_number, ClassList, ClassToken, BREAKPOINTS};

use super::error::ContractError;
use super::pipeline::{rewrite, Artifact, Contract, ContractContext, ContractOutput};

/// Half of a padding value, `None` for zero or non-numeric values
fn halve(value: &str) -> Option<String> {
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let n: f64 = inner.strip_suffix("px")?.parse().ok()?;
        return (n != 0.0).then(|| format!("[{}px]", format_number(n / 2.0)));
    }
    let n: f64 = value.parse().ok()?;
    (n != 0.0).then(|| format_number(n / 2.0))
}

/// Families whose breakpoint tokens already decide vertical padding for `family`
fn counterparts(family: &str) -> &'static [&'static str] {
    match family {
        "p" | "py" => &["p", "py"],
        "pt" => &["pt", "py", "p"],
        "pb" => &["pb", "py", "p"],
        _ => &[],
    }
}

fn split_vertical_padding(classes: &ClassList, bp: &str) -> ClassList {
    let mut out = ClassList::new();
    for t in classes.iter() {
        let family = t.family();
        let value = t.base.get(family.len() + 1..).unwrap_or("");
        let vertical = t.is_unprefixed() && matches!(family, "p" | "py" | "pt" | "pb");
        let Some(half) = vertical.then(|| halve(value)).flatten() else {
            out.push(t.raw);
            continue;
        };

        let restored_family = if family == "p" { "py" } else { family };
        let restored = format!("{}-{}", restored_family, value);
        let overridden = classes.iter().any(|o| {
            o.variant == bp && counterparts(family).contains(&o.family()) && o.base != restored
        });
        if overridden {
            out.push(t.raw);
            continue;
        }

        if family == "p" {
            out.push(format!("px-{}", value));
        }
        out.push(format!("{}-{}", restored_family, half));
        out.push(format!("{}:{}", bp, restored));
    }
    out.dedupe();
    out
}

/// Sections keep their horizontal padding and get half the vertical padding
/// below the padding breakpoint
pub struct SectionPadding;

impl Contract for SectionPadding {
    fn name(&self) -> &'static str {
        "sectionPadding"
    }

    fn order(&self) -> u32 {
        75
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Tag]
    }

    fn apply(&self, html: &str, ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        let bp = ctx.config.padding_breakpoint.as_str();
        rewrite(html, |rw, _| {
            let doc = rw.doc();
            for i in 0..doc.len() {
                if doc.parent(i).is_some() && rw.node(i).tag != "section" {
                    continue;
                }
                let split = split_vertical_padding(&rw.classes(i), bp);
                rw.set_classes(i, &split);
            }
        })
    }
}

const POSITION_UTILITIES: &[&str] = &[
    "bg-center",
    "bg-top",
    "bg-bottom",
    "bg-left",
    "bg-right",
    "bg-left-top",
    "bg-left-bottom",
    "bg-right-top",
    "bg-right-bottom",
];

fn is_position_utility(t: &ClassToken<'_>) -> bool {
    POSITION_UTILITIES.contains(&t.base) || t.base.starts_with("bg-[position:")
}

/// Background positions are dropped from elements with no background image
pub struct BgPositionCleanup;

impl Contract for BgPositionCleanup {
    fn name(&self) -> &'static str {
        "bgPositionCleanup"
    }

    fn order(&self) -> u32 {
        80
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            for i in 0..rw.doc().len() {
                if rw.node(i).has_background_image() {
                    continue;
                }
                rw.update_classes(i, |c| {
                    c.retain(|t| !is_position_utility(t));
                });
            }
        })
    }
}

/// Drop a breakpoint token equal to its base unless a smaller breakpoint
/// changed the same property in between
fn drop_repeated_variants(classes: &mut ClassList) {
    classes.dedupe();
    let tokens: Vec<ClassToken<'_>> = classes.iter().collect();
    let mut redundant = Vec::new();
    for (i, t) in tokens.iter().enumerate() {
        let Some(bp) = t.breakpoint() else { continue };
        if !classes.has_base(t.base) {
            continue;
        }
        let rank = BREAKPOINTS.iter().position(|b| *b == bp).unwrap_or(0);
        let changed_between = tokens.iter().any(|o| {
            o.breakpoint()
                .and_then(|b| BREAKPOINTS.iter().position(|x| *x == b))
                .is_some_and(|r| r < rank)
                && o.family() == t.family()
                && o.base != t.base
        });
        if !changed_between {
            redundant.push(i);
        }
    }
    if !redundant.is_empty() {
        classes.retain_indexed(|i, _| !redundant.contains(&i));
    }
}

pub struct ResponsiveDuplicateCleanup;

impl Contract for ResponsiveDuplicateCleanup {
    fn name(&self) -> &'static str {
        "responsiveDuplicateCleanup"
    }

    fn order(&self) -> u32 {
        90
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            for i in 0..rw.doc().len() {
                rw.update_classes(i, drop_repeated_variants);
            }
        })
    }
}
