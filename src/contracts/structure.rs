//! Structural contracts: tag promotion and demotion, decorative bars, text
//! entity repair, and semantic tag recovery from typography.

use std::sync::LazyLock;

use regex::Regex;

use crate::inference::Intent;
use crate::markup::{bracket_value, parse_px, ClassList, ClassToken, ParsedNode};

use super::config::TypographyFingerprint;
use super::error::ContractError;
use super::pipeline::{rewrite, Artifact, Contract, ContractContext, ContractOutput};

static DOUBLE_ESCAPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&amp;((?:amp|lt|gt|quot|#39|#x27|nbsp|#\d+);)")
        .expect("double escape pattern is valid")
});

fn is_color_value(value: &str) -> bool {
    value.starts_with('#') || value.starts_with("rgb") || value.starts_with("hsl")
}

/// Pixel value of a height token: `h-px`, `h-2`, `h-[3px]`
fn height_px(token: &ClassToken<'_>) -> Option<f64> {
    match token.base.strip_prefix("h-")? {
        "px" => Some(1.0),
        rest if rest.starts_with('[') => bracket_value(token.base).and_then(parse_px),
        rest => rest.parse::<f64>().ok().map(|n| n * 4.0),
    }
}

struct Bar {
    width: String,
    color: String,
}

fn bar_of(classes: &ClassList) -> Option<Bar> {
    let mut width = None;
    let mut color = None;
    for t in classes.iter().filter(|t| t.is_unprefixed()) {
        if !t.base.starts_with("border-[") {
            continue;
        }
        let value = t.bracket_value()?;
        if is_color_value(value) {
            color = Some(value.to_string());
        } else if value.ends_with("px") {
            width = Some(value.to_string());
        }
    }
    let (width, color) = (width?, color?);
    let w = parse_px(&width)?;
    let thin = classes
        .iter()
        .filter(|t| t.is_unprefixed() && t.is_literal_height())
        .all(|t| height_px(&t).map(|h| h <= w).unwrap_or(false));
    thin.then_some(Bar { width, color })
}

fn is_border_token(t: &ClassToken<'_>) -> bool {
    t.is_unprefixed()
        && (matches!(t.base, "border" | "border-dashed" | "border-solid")
            || t.base.starts_with("border-["))
}

/// An empty bordered `div` thinner than its border becomes a solid bar
pub struct UnderlineBar;

impl Contract for UnderlineBar {
    fn name(&self) -> &'static str {
        "underlineBar"
    }

    fn order(&self) -> u32 {
        5
    }

    fn writes(&self) -> &'static [Artifact] {
        &[Artifact::Decorative]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, notes| {
            let doc = rw.doc();
            for i in 0..doc.len() {
                let node = rw.node(i);
                if node.tag != "div"
                    || node.is_self_closing
                    || doc.has_element_children(i)
                    || !doc.inner_html(i).trim().is_empty()
                {
                    continue;
                }
                let Some(bar) = bar_of(&rw.classes(i)) else { continue };
                rw.update_classes(i, |c| {
                    let at = c
                        .retain(|t| !is_border_token(t) && !(t.is_unprefixed() && t.is_height()))
                        .unwrap_or(c.len());
                    c.ensure_at(at, format!("h-[{}]", bar.width));
                    c.ensure_at(at + 1, format!("bg-[{}]", bar.color));
                });
                rw.set_attr(i, "data-decorative", "1");
                notes.push(format!("{}: solid bar", doc.label(i)));
            }
        })
    }
}

/// Undo one level of entity double escaping in leaf text, repeatedly
fn unescape_twice_escaped(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = DOUBLE_ESCAPED.replace_all(&current, "&$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

pub struct TextSanity;

impl Contract for TextSanity {
    fn name(&self) -> &'static str {
        "textSanity"
    }

    fn order(&self) -> u32 {
        8
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, _| {
            let doc = rw.doc();
            for i in 0..doc.len() {
                if !doc.is_text_leaf(i) {
                    continue;
                }
                let inner = doc.inner_html(i);
                if DOUBLE_ESCAPED.is_match(inner) {
                    rw.set_inner_html(i, unescape_twice_escaped(inner));
                }
            }
        })
    }
}

const BUTTON_SIGNALS: &[&str] = &["data-action", "onclick", "type"];

fn has_button_signal(node: &ParsedNode) -> bool {
    BUTTON_SIGNALS.iter().any(|a| node.has_attr(a)) || node.attr("role") == Some("button")
}

/// Interactive tags only where an action exists and never nested
pub struct Cta;

impl Contract for Cta {
    fn name(&self) -> &'static str {
        "cta"
    }

    fn order(&self) -> u32 {
        10
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::Decorative]
    }

    fn writes(&self) -> &'static [Artifact] {
        &[Artifact::Tag]
    }

    fn apply(&self, html: &str, _ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, notes| {
            let doc = rw.doc();
            let mut interactive = vec![false; doc.len()];
            for i in 0..doc.len() {
                let nested = doc.ancestors(i).any(|a| interactive[a]);
                let node = rw.node(i);
                let tag = node.tag.clone();
                if node.is_decorative() {
                    interactive[i] = node.is_interactive();
                    continue;
                }

                let href = node.attr("href").or_else(|| node.attr("data-href")).map(str::to_string);
                let signal = has_button_signal(node);
                let label = doc.label(i);
                match tag.as_str() {
                    "div" if !nested && href.is_some() => {
                        let href = href.unwrap_or_default();
                        rw.rename(i, "a");
                        rw.remove_attr(i, "data-href");
                        rw.set_attr(i, "href", &href);
                        interactive[i] = true;
                        notes.push(format!("{label}: div -> a"));
                    }
                    "div" if !nested && signal => {
                        rw.rename(i, "button");
                        rw.remove_attr(i, "role");
                        rw.set_attr(i, "type", "button");
                        interactive[i] = true;
                        notes.push(format!("{label}: div -> button"));
                    }
                    "a" if nested || !node.has_attr("href") => {
                        let moved = node.attr("href").map(str::to_string);
                        rw.rename(i, "div");
                        if let Some(href) = moved {
                            rw.remove_attr(i, "href");
                            rw.set_attr(i, "data-href", &href);
                        }
                        notes.push(format!("{label}: a -> div"));
                    }
                    "button" if nested || !signal => {
                        rw.rename(i, "div");
                        rw.remove_attr(i, "type");
                        rw.remove_attr(i, "role");
                        notes.push(format!("{label}: button -> div"));
                    }
                    "a" | "button" => interactive[i] = true,
                    _ => {}
                }
            }
        })
    }
}

fn matches_fingerprint(classes: &ClassList, f: &TypographyFingerprint) -> bool {
    classes.has_base(&f.size)
        && classes.has_base(&f.weight)
        && classes.has_base(&f.leading)
        && f.family.as_deref().map_or(true, |family| classes.has_base(family))
}

/// Generic text boxes with a known typography signature get their semantic
/// tag back and lose literal widths unless their width is fixed
pub struct SemanticRestoreWidthCleanup;

impl Contract for SemanticRestoreWidthCleanup {
    fn name(&self) -> &'static str {
        "semanticRestoreWidthCleanup"
    }

    fn order(&self) -> u32 {
        15
    }

    fn reads(&self) -> &'static [Artifact] {
        &[Artifact::WidthIntent]
    }

    fn writes(&self) -> &'static [Artifact] {
        &[Artifact::Tag]
    }

    fn apply(&self, html: &str, ctx: &ContractContext<'_>) -> Result<ContractOutput, ContractError> {
        rewrite(html, |rw, notes| {
            let doc = rw.doc();
            for i in 0..doc.len() {
                let node = rw.node(i);
                if node.tag != "div" || !doc.is_text_leaf(i) {
                    continue;
                }
                let classes = node.classes();
                let Some(print) = ctx
                    .config
                    .typography
                    .iter()
                    .find(|f| matches_fingerprint(&classes, f))
                else {
                    continue;
                };
                let fixed = node.width_intent().and_then(Intent::parse) == Some(Intent::Fixed);
                rw.rename(i, &print.tag);
                if !fixed {
                    rw.update_classes(i, |c| {
                        c.retain(|t| !(t.is_unprefixed() && t.is_literal_width()));
                    });
                }
                notes.push(format!("{}: restored <{}>", doc.label(i), print.tag));
            }
        })
    }
}
