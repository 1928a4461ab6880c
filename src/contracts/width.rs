//! Width contracts: intent enforcement, grid and flex column widths, and
//! removal of redundant width utilities

use std::collections::BTreeSet;

use crate::inference::Intent;
use crate::markup::{ClassList, ParsedNode};

use super::pipeline::{rewrite, Artifact, Contract, ContractContext, ContractOutput};
use super::error::ContractError;

fn intent_of(node: &ParsedNode) -> Option<Intent> {
    node.width_intent().and_then(Intent::parse)
}

/// Elements that keep their own widths when an ancestor is normalized
fn owns_width(node: &ParsedNode) -> bool {
    node.is_decorative() || node.tag == "img" || node.has_background_image()
}

/// Remove every width token except `keep`, then make sure `keep` is present
/// where the first removed token was
fn force_width(classes: &mut ClassList, keep: &str) {
    let at = classes.retain(|t| !t.is_width() || (t.is_unprefixed() && t.base == keep));
    match at {
        Some(at) => classes.ensure_at(at, keep),
        None => classes.ensure(keep),
    };
}

fn enforce_width_intent(classes: &mut ClassList, intent: Intent) {
    match intent {
        Intent::Fill => {
            let at = classes.retain(|t| !(t.is_unprefixed() && t.is_width() && t.base != "w-full"));
            match at {
                Some(at) => classes.ensure_at(at, "w-full"),
                None => classes.ensure("w-full"),
            };
        }
        Intent::Hug => {
            classes.retain(|t| !(t.is_unprefixed() && t.is_literal_width()));
        }
        Intent::Fixed => {
            if let Some(keep) = classes.last_position(|t| t.is_unprefixed() && t.is_literal_width()) {
                classes.retain_indexed(|i, t| i == keep || !(t.is_unprefixed() && t.is_width()));
            }
        }
    }
}

/// fill: exactly `w-full`; hug: no literal width; fixed: one literal width
pub struct WidthIntent;

impl Contract for WidthIntent {
    fn name(&self) -> &'static str {
        "widthIntent"
    }

    fn order(&self) -> u32 {
        20
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::WidthIntent, Artifact::Decorative]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            for i in 0..rw.doc().len() {
                let node = rw.node(i);
                if node.is_decorative() {
                    continue;
                }
                let Some(intent) = intent_of(node) else { continue };
                rw.update_classes(i, |c| enforce_width_intent(c, intent));
            }
        })
    }
}

/// Direct children of a grid fill their track; text children drop their
/// widths instead
pub struct GridWidths;

impl Contract for GridWidths {
    fn name(&self) -> &'static str {
        "gridWidths"
    }

    fn order(&self) -> u32 {
        30
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Decorative]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            let doc = rw.doc();
            for grid in 0..doc.len() {
                if !rw.classes(grid).has_base("grid") {
                    continue;
                }
                for child in doc.children(grid) {
                    let node = rw.node(child);
                    if node.is_decorative() || node.is_media() {
                        continue;
                    }
                    let textual = !node.is_interactive()
                        && (node.is_text_tag() || doc.is_text_leaf(child));
                    if textual {
                        rw.update_classes(child, |c| {
                            c.retain(|t| !t.is_width());
                        });
                    } else {
                        rw.update_classes(child, |c| force_width(c, "w-full"));
                    }
                }
            }
        })
    }
}

/// Inside grid columns: controls fill, text drops widths, the rest drops
/// literal widths
pub struct GridColumnWidthCleanup;

impl Contract for GridColumnWidthCleanup {
    fn name(&self) -> &'static str {
        "gridColumnWidthCleanup"
    }

    fn order(&self) -> u32 {
        31
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Decorative, Artifact::Tag]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            let doc = rw.doc();
            let mut visited = vec![false; doc.len()];
            for grid in 0..doc.len() {
                if !rw.classes(grid).has_base("grid") {
                    continue;
                }
                for d in doc.descendants(grid) {
                    if doc.parent(d) == Some(grid) || visited[d] {
                        continue;
                    }
                    visited[d] = true;
                    let node = rw.node(d);
                    if owns_width(node) {
                        continue;
                    }
                    let interactive = node.is_interactive();
                    let textual = node.is_text_tag() || doc.is_text_leaf(d);
                    if interactive {
                        rw.update_classes(d, |c| force_width(c, "w-full"));
                    } else if textual {
                        rw.update_classes(d, |c| {
                            c.retain(|t| !t.is_width());
                        });
                    } else {
                        rw.update_classes(d, |c| {
                            c.retain(|t| !t.is_literal_width());
                        });
                    }
                }
            }
        })
    }
}

/// A two-column flex row stacks below `md` and splits in halves above it
pub struct FlexWidths;

impl Contract for FlexWidths {
    fn name(&self) -> &'static str {
        "flexWidths"
    }

    fn order(&self) -> u32 {
        40
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Decorative, Artifact::Tag]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, notes| {
            let doc = rw.doc();
            for row in 0..doc.len() {
                let classes = rw.classes(row);
                let is_row = classes.has_base("flex")
                    && !classes.has_base("flex-col")
                    && !classes.has_base("grid")
                    && !rw.node(row).is_interactive();
                if !is_row {
                    continue;
                }
                let columns = doc.children(row);
                if columns.len() != 2 {
                    continue;
                }
                let eligible = columns.iter().all(|&c| {
                    let node = rw.node(c);
                    !node.is_decorative() && !node.is_media() && doc.has_element_children(c)
                });
                if !eligible {
                    continue;
                }

                for &column in &columns {
                    rw.update_classes(column, |c| {
                        let at = c.retain(|t| !t.is_width()).unwrap_or(c.len());
                        c.ensure_at(at, "w-full");
                        c.ensure_at(at + 1, "md:w-1/2");
                    });
                    for d in doc.descendants(column) {
                        if owns_width(rw.node(d)) {
                            continue;
                        }
                        rw.update_classes(d, |c| {
                            c.retain(|t| !t.is_bracket_width());
                        });
                    }
                }
                notes.push(format!("{}: two-column row", doc.label(row)));
            }
        })
    }
}

/// Drop literal widths and `max-w-full` that repeat the parent's token
pub struct WidthNoise;

impl Contract for WidthNoise {
    fn name(&self) -> &'static str {
        "widthNoise"
    }

    fn order(&self) -> u32 {
        50
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Decorative]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            let doc = rw.doc();
            for i in 0..doc.len() {
                let Some(parent) = doc.parent(i) else { continue };
                let node = rw.node(i);
                if node.is_decorative() || node.is_media() {
                    continue;
                }
                // Compare against the parent as it was before this pass
                let parent_classes = doc.node(parent).classes();
                rw.update_classes(i, |c| {
                    c.retain(|t| {
                        let noisy = t.is_literal_width() || t.base == "max-w-full";
                        !(noisy && parent_classes.contains(t.raw))
                    });
                });
            }
        })
    }
}

const WRAPPING_PREFIXES: &[&str] = &[
    "whitespace-",
    "break-",
    "truncate",
    "line-clamp-",
    "text-wrap",
    "text-nowrap",
    "text-balance",
    "text-pretty",
    "text-ellipsis",
    "hyphens-",
];

const FLEX_SIZING_PREFIXES: &[&str] = &[
    "grow", "shrink", "basis-", "flex-1", "flex-auto", "flex-initial", "flex-none", "min-w-",
];

fn protects_max_width(base: &str) -> bool {
    WRAPPING_PREFIXES
        .iter()
        .chain(FLEX_SIZING_PREFIXES)
        .any(|p| base.starts_with(p))
}

/// Remove `max-w-full` once no literal width, wrapping, or flex-sizing
/// token depends on it
fn drop_unneeded_max_w_full(classes: &mut ClassList) {
    if !classes.has_base("max-w-full") {
        return;
    }
    let needed = classes
        .iter()
        .any(|t| t.is_literal_width() || protects_max_width(t.base));
    if !needed {
        classes.remove("max-w-full");
    }
}

/// `max-w-full` is only kept where something still depends on it
pub struct MaxWFullDedupe;

impl Contract for MaxWFullDedupe {
    fn name(&self) -> &'static str {
        "maxWFullDedupe"
    }

    fn order(&self) -> u32 {
        60
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Tag]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            for i in 0..rw.doc().len() {
                if rw.node(i).is_media() {
                    continue;
                }
                rw.update_classes(i, drop_unneeded_max_w_full);
            }
        })
    }
}

/// At most one width utility per variant, chosen by intent
fn sanitize_widths(classes: &mut ClassList, intent: Option<Intent>) {
    if matches!(intent, Some(Intent::Hug) | Some(Intent::Fill)) {
        classes.retain(|t| !(t.is_unprefixed() && t.is_literal_width()));
    }

    let variants: BTreeSet<String> = classes
        .iter()
        .filter(|t| t.is_width())
        .map(|t| t.variant.to_string())
        .collect();

    let mut drop = BTreeSet::new();
    for variant in &variants {
        let widths: Vec<usize> = classes
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_width() && t.variant == variant.as_str())
            .map(|(i, _)| i)
            .collect();
        if widths.len() < 2 {
            continue;
        }
        let tokens: Vec<_> = classes.iter().collect();
        let last = |pred: &dyn Fn(usize) -> bool| widths.iter().copied().filter(|&i| pred(i)).last();
        let fallback = widths[widths.len() - 1];
        let chosen = match intent {
            Some(Intent::Fill) => last(&|i| tokens[i].base == "w-full"),
            Some(Intent::Fixed) => last(&|i| tokens[i].is_literal_width()),
            Some(Intent::Hug) => last(&|i| !tokens[i].is_literal_width()),
            None => None,
        }
        .unwrap_or(fallback);
        drop.extend(widths.into_iter().filter(|&i| i != chosen));
    }

    if !drop.is_empty() {
        classes.retain_indexed(|i, _| !drop.contains(&i));
    }
}

/// Final width exclusivity check; only ever removes tokens
pub struct WidthIntentSanity;

impl Contract for WidthIntentSanity {
    fn name(&self) -> &'static str {
        "widthIntentSanity"
    }

    fn order(&self) -> u32 {
        85
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::WidthIntent, Artifact::Decorative]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, notes| {
            for i in 0..rw.doc().len() {
                let node = rw.node(i);
                if node.is_decorative() {
                    continue;
                }
                let intent = intent_of(node);
                let is_media = node.is_media();
                let before = rw.classes(i);
                let mut after = before.clone();
                sanitize_widths(&mut after, intent);
                if after != before {
                    // The dropped width may have been all that kept max-w-full
                    if !is_media {
                        drop_unneeded_max_w_full(&mut after);
                    }
                    notes.push(format!("{}: conflicting widths", rw.doc().label(i)));
                    rw.set_classes(i, &after);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{ContractConfig, ContractPipeline};
    use pretty_assertions::assert_eq;

    fn run(names: &[&str], html: &str) -> String {
        ContractPipeline::only(names).unwrap().apply(html).unwrap()
    }

    fn apply_one(contract: &dyn Contract, html: &str) -> ContractOutput {
        let config = ContractConfig::default();
        contract.apply(html, &ContractContext { config: &config }).unwrap()
    }

    #[test]
    fn test_fill_reduces_to_w_full() {
        assert_eq!(
            run(&["widthIntent"], r#"<div data-w-intent="fill" class="flex w-[300px] md:w-[200px]"></div>"#),
            r#"<div data-w-intent="fill" class="flex w-full md:w-[200px]"></div>"#
        );
    }

    #[test]
    fn test_hug_drops_literals() {
        assert_eq!(
            run(&["widthIntent"], r#"<div data-w-intent="hug" class="w-[300px] w-full"></div>"#),
            r#"<div data-w-intent="hug" class="w-full"></div>"#
        );
    }

    #[test]
    fn test_fixed_keeps_last_literal() {
        assert_eq!(
            run(&["widthIntent"], r#"<div data-w-intent="fixed" class="w-full w-[100px] w-[120px]"></div>"#),
            r#"<div data-w-intent="fixed" class="w-[120px]"></div>"#
        );
    }

    #[test]
    fn test_decorative_is_untouched() {
        let html = r#"<div data-w-intent="fill" data-decorative="1" class="w-[300px]"></div>"#;
        let out = apply_one(&WidthIntent, html);
        assert_eq!(out.html, html);
        assert!(out.changed_nodes.is_empty());
    }

    #[test]
    fn test_grid_children_fill_tracks() {
        let html = r#"<div class="grid grid-cols-1 md:grid-cols-2"><div data-node="a" class="w-[300px] max-w-full"><p class="w-[200px]">x</p><a href="/" class="w-[120px]">Go</a></div><img class="w-[300px]" src="a.png"></div>"#;
        assert_eq!(
            run(&["gridWidths", "gridColumnWidthCleanup"], html),
            r#"<div class="grid grid-cols-1 md:grid-cols-2"><div data-node="a" class="w-full max-w-full"><p>x</p><a href="/" class="w-full">Go</a></div><img class="w-[300px]" src="a.png"></div>"#
        );
    }

    #[test]
    fn test_grid_text_children_lose_widths() {
        let html = r#"<div class="grid grid-cols-2"><p class="w-[200px] text-[16px]">a</p><p>b</p><div class="w-[300px]">c</div></div>"#;
        assert_eq!(
            run(&["gridWidths", "gridColumnWidthCleanup"], html),
            r#"<div class="grid grid-cols-2"><p class="text-[16px]">a</p><p>b</p><div>c</div></div>"#
        );
    }

    #[test]
    fn test_grid_descendant_media_keeps_width() {
        let html = r#"<div class="grid"><div><div class="w-[80px] bg-[url('a.png')]"></div><div class="w-[40px] h-[2px]" data-decorative="1"></div><div class="w-[90px]"><span></span></div></div></div>"#;
        assert_eq!(
            run(&["gridColumnWidthCleanup"], html),
            r#"<div class="grid"><div><div class="w-[80px] bg-[url('a.png')]"></div><div class="w-[40px] h-[2px]" data-decorative="1"></div><div><span></span></div></div></div>"#
        );
    }

    #[test]
    fn test_two_column_flex_row() {
        let html = r#"<div data-node="row" class="flex flex-row"><div class="w-[600px] shrink-0"><p class="w-[500px]">A</p><img class="w-[500px]" src="a.png"></div><div class="w-full grow"><p>B</p></div></div>"#;
        let out = apply_one(&FlexWidths, html);
        assert_eq!(
            out.html,
            r#"<div data-node="row" class="flex flex-row"><div class="w-full md:w-1/2 shrink-0"><p>A</p><img class="w-[500px]" src="a.png"></div><div class="w-full md:w-1/2 grow"><p>B</p></div></div>"#
        );
        assert_eq!(out.notes, vec!["row: two-column row".to_string()]);
    }

    #[test]
    fn test_flex_row_needs_two_content_columns() {
        let html = r#"<div class="flex"><div class="w-[600px]"></div><div class="w-[300px]"><p>B</p></div></div>"#;
        assert_eq!(run(&["flexWidths"], html), html);
        let col = r#"<div class="flex flex-col"><div class="w-[600px]"><p>A</p></div><div><p>B</p></div></div>"#;
        assert_eq!(run(&["flexWidths"], col), col);
    }

    #[test]
    fn test_width_noise_matches_parent_variant() {
        let html = r#"<div class="w-[1200px] max-w-full md:w-[800px]"><div class="w-[1200px] max-w-full w-[800px] md:w-[800px]"></div></div>"#;
        assert_eq!(
            run(&["widthNoise"], html),
            r#"<div class="w-[1200px] max-w-full md:w-[800px]"><div class="w-[800px]"></div></div>"#
        );
    }

    #[test]
    fn test_max_w_full_protections() {
        let html = r#"<div class="max-w-full"><p class="max-w-full truncate">a</p><div class="max-w-full shrink-0"></div><div class="max-w-full w-[10px]"></div><img class="max-w-full" src="x"></div>"#;
        assert_eq!(
            run(&["maxWFullDedupe"], html),
            r#"<div><p class="max-w-full truncate">a</p><div class="max-w-full shrink-0"></div><div class="max-w-full w-[10px]"></div><img class="max-w-full" src="x"></div>"#
        );
    }

    #[test]
    fn test_sanity_releases_max_w_full() {
        let html = r#"<div data-w-intent="fill" class="md:w-[300px] md:w-full max-w-full w-full"></div>"#;
        assert_eq!(
            run(&["widthIntentSanity"], html),
            r#"<div data-w-intent="fill" class="md:w-full w-full"></div>"#
        );
        let kept = r#"<div data-w-intent="fill" class="md:w-[300px] md:w-full max-w-full truncate"></div>"#;
        assert_eq!(
            run(&["widthIntentSanity"], kept),
            r#"<div data-w-intent="fill" class="md:w-full max-w-full truncate"></div>"#
        );
    }

    #[test]
    fn test_sanity_one_width_per_variant() {
        let html = r#"<div data-w-intent="hug" class="w-auto w-fit md:w-[300px] md:w-full"></div>"#;
        assert_eq!(
            run(&["widthIntentSanity"], html),
            r#"<div data-w-intent="hug" class="w-fit md:w-full"></div>"#
        );
        let fixed = r#"<div data-w-intent="fixed" class="md:w-[300px] md:w-full"></div>"#;
        assert_eq!(
            run(&["widthIntentSanity"], fixed),
            r#"<div data-w-intent="fixed" class="md:w-[300px]"></div>"#
        );
        let none = r#"<div class="w-1/2 w-full"></div>"#;
        assert_eq!(run(&["widthIntentSanity"], none), r#"<div class="w-full"></div>"#);
    }
}
