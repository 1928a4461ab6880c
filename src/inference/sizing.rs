//! Per-axis sizing intents and the utilities they map to

use std::fmt;

use crate::design::{AutoLayout, CounterAlign, DesignNode, LayoutMode, Padding, PrimaryAlign, Sizing};
use crate::markup::classes::{format_number, ClassList};

/// How a node's size responds to its container along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Fill,
    Hug,
    Fixed,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Fill => "fill",
            Intent::Hug => "hug",
            Intent::Fixed => "fixed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fill" => Some(Intent::Fill),
            "hug" => Some(Intent::Hug),
            "fixed" => Some(Intent::Fixed),
            _ => None,
        }
    }
}

impl From<Sizing> for Intent {
    fn from(sizing: Sizing) -> Self {
        match sizing {
            Sizing::Fill => Intent::Fill,
            Sizing::Hug => Intent::Hug,
            Sizing::Fixed => Intent::Fixed,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisIntents {
    pub width: Intent,
    pub height: Intent,
}

impl AxisIntents {
    pub fn new(width: Intent, height: Intent) -> Self {
        Self { width, height }
    }
}

/// Resolve width/height intents from sizing modes alone.
///
/// A child's `(primary, counter)` sizing is relative to its parent's
/// auto-layout direction; without a directed parent the primary axis is
/// horizontal. Nodes without per-child sizing fall back to their own
/// auto-layout sizing, text hugs, and everything else is fixed.
pub fn resolve_intents(node: &DesignNode, parent: Option<&DesignNode>) -> AxisIntents {
    if let Some(sizing) = node.sizing {
        let (primary, counter) = (Intent::from(sizing.primary), Intent::from(sizing.counter));
        return match parent.map(DesignNode::layout_mode) {
            Some(LayoutMode::Vertical) => AxisIntents::new(counter, primary),
            _ => AxisIntents::new(primary, counter),
        };
    }

    if parent.is_none() {
        let height = match &node.auto {
            Some(auto) if auto.layout == LayoutMode::Vertical && auto.primary_sizing == Sizing::Hug => {
                Intent::Hug
            }
            _ => Intent::Fixed,
        };
        return AxisIntents::new(Intent::Fill, height);
    }

    if let Some(auto) = &node.auto {
        match auto.layout {
            LayoutMode::Horizontal => {
                return AxisIntents::new(auto.primary_sizing.into(), auto.counter_sizing.into())
            }
            LayoutMode::Vertical => {
                return AxisIntents::new(auto.counter_sizing.into(), auto.primary_sizing.into())
            }
            LayoutMode::None => {}
        }
    }

    if node.is_text() {
        return AxisIntents::new(Intent::Hug, Intent::Hug);
    }
    AxisIntents::new(Intent::Fixed, Intent::Fixed)
}

/// Sizing and self-alignment utilities for one node
pub fn sizing_classes(
    node: &DesignNode,
    intents: AxisIntents,
    parent: Option<&DesignNode>,
    parent_is_grid: bool,
) -> ClassList {
    let mut classes = ClassList::new();
    let parent_layout = if parent_is_grid {
        LayoutMode::None
    } else {
        parent.map(DesignNode::layout_mode).unwrap_or_default()
    };

    match intents.width {
        Intent::Fill => {
            classes.push("w-full");
            if parent_layout == LayoutMode::Horizontal {
                classes.extend(["grow", "basis-0", "min-w-0"]);
            }
        }
        Intent::Fixed => {
            if let Some(w) = node.width() {
                classes.push(format!("w-[{}px]", format_number(w)));
                classes.push("max-w-full");
                if parent_layout == LayoutMode::Horizontal {
                    classes.ensure("shrink-0");
                }
            }
        }
        Intent::Hug => {}
    }

    match intents.height {
        Intent::Fill => {
            classes.push("h-full");
            if parent_layout == LayoutMode::Vertical {
                classes.extend(["grow", "basis-0", "min-h-0"]);
            }
        }
        Intent::Fixed => {
            if let Some(h) = node.height() {
                classes.push(format!("h-[{}px]", format_number(h)));
                if parent_layout == LayoutMode::Vertical {
                    classes.ensure("shrink-0");
                }
            }
        }
        Intent::Hug => {}
    }

    if let Some(align) = node.sizing.and_then(|s| s.align) {
        if let Some(token) = self_align(align) {
            classes.push(token);
        }
    }
    classes
}

/// Stretch is never emitted
fn self_align(align: CounterAlign) -> Option<&'static str> {
    match align {
        CounterAlign::Min => Some("self-start"),
        CounterAlign::Center => Some("self-center"),
        CounterAlign::Max => Some("self-end"),
        CounterAlign::Baseline => Some("self-baseline"),
        CounterAlign::Stretch | CounterAlign::Inherit => None,
    }
}

fn items_align(align: CounterAlign) -> Option<&'static str> {
    match align {
        CounterAlign::Min => Some("items-start"),
        CounterAlign::Center => Some("items-center"),
        CounterAlign::Max => Some("items-end"),
        CounterAlign::Baseline => Some("items-baseline"),
        CounterAlign::Stretch | CounterAlign::Inherit => None,
    }
}

fn justify(align: PrimaryAlign) -> &'static str {
    match align {
        PrimaryAlign::Min => "justify-start",
        PrimaryAlign::Center => "justify-center",
        PrimaryAlign::Max => "justify-end",
        PrimaryAlign::SpaceBetween => "justify-between",
    }
}

fn px(value: f64) -> String {
    format!("[{}px]", format_number(value))
}

/// Padding utilities, collapsed to `p-` or `px-`/`py-` where sides agree
pub fn padding_classes(padding: &Padding) -> ClassList {
    let Padding {
        top,
        right,
        bottom,
        left,
    } = *padding;
    let mut classes = ClassList::new();
    if top == right && right == bottom && bottom == left {
        if top > 0.0 {
            classes.push(format!("p-{}", px(top)));
        }
        return classes;
    }
    if left == right && top == bottom {
        if left > 0.0 {
            classes.push(format!("px-{}", px(left)));
        }
        if top > 0.0 {
            classes.push(format!("py-{}", px(top)));
        }
        return classes;
    }
    for (prefix, value) in [("pt", top), ("pr", right), ("pb", bottom), ("pl", left)] {
        if value > 0.0 {
            classes.push(format!("{}-{}", prefix, px(value)));
        }
    }
    classes
}

/// Flex container utilities for an auto-layout node
pub fn flex_classes(auto: &AutoLayout) -> ClassList {
    let mut classes = ClassList::new();
    match auto.layout {
        LayoutMode::Horizontal => classes.extend(["flex", "flex-row"]),
        LayoutMode::Vertical => classes.extend(["flex", "flex-col"]),
        LayoutMode::None => {
            classes.push("relative");
            return classes;
        }
    }
    if auto.item_spacing > 0.0 && auto.primary_align != PrimaryAlign::SpaceBetween {
        classes.push(format!("gap-{}", px(auto.item_spacing)));
    }
    classes.extend(padding_classes(&auto.padding));
    if auto.primary_align != PrimaryAlign::Min {
        classes.push(justify(auto.primary_align));
    }
    if let Some(items) = items_align(auto.counter_align) {
        classes.push(items);
    }
    classes
}

/// Grid container utilities; single column below `md`
pub fn grid_classes(auto: Option<&AutoLayout>, cols: usize) -> ClassList {
    let mut classes: ClassList = ["grid", "grid-cols-1"].into_iter().collect();
    classes.push(format!("md:grid-cols-{cols}"));
    if let Some(auto) = auto {
        if auto.item_spacing > 0.0 {
            classes.push(format!("gap-{}", px(auto.item_spacing)));
        }
        classes.extend(padding_classes(&auto.padding));
    }
    classes
}
