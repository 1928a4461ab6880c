//! Design tree types as produced by the exporter
//!
//! The exporter hands over a loosely-typed JSON tree. Everything here is
//! resolved once at deserialization time: optional geometry, paints, and
//! typography become explicit `Option`s and sum types, so consumers never
//! probe for fields ad hoc.

use serde::Deserialize;

/// Kind of design node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    #[default]
    Frame,
    Group,
    Component,
    Instance,
    Section,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    Star,
    Polygon,
    BooleanOperation,
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Kinds whose geometry only makes sense as a vector drawing
    pub fn is_vector(self) -> bool {
        matches!(
            self,
            NodeKind::Vector | NodeKind::Star | NodeKind::Polygon | NodeKind::BooleanOperation
        )
    }
}

/// Auto-layout direction of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Sizing mode along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sizing {
    Fill,
    #[serde(alias = "AUTO")]
    Hug,
    #[default]
    Fixed,
}

/// Distribution of children along the primary axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
}

/// Placement of children (or of one child) along the counter axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAlign {
    #[default]
    Min,
    Center,
    Max,
    Baseline,
    Stretch,
    Inherit,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The container's auto-layout descriptor
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoLayout {
    pub layout: LayoutMode,
    pub item_spacing: f64,
    pub padding: Padding,
    pub primary_align: PrimaryAlign,
    pub counter_align: CounterAlign,
    pub primary_sizing: Sizing,
    pub counter_sizing: Sizing,
}

/// How a child sizes itself relative to its parent's auto-layout axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ChildSizing {
    pub primary: Sizing,
    pub counter: Sizing,
    pub align: Option<CounterAlign>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradientStop {
    pub color: String,
    #[serde(default)]
    pub position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    #[default]
    Fill,
    Fit,
    Crop,
    Tile,
}

fn visible_default() -> bool {
    true
}

/// A single paint layer; later entries paint on top
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Paint {
    Solid {
        color: String,
        #[serde(default)]
        opacity: Option<f64>,
        #[serde(default = "visible_default")]
        visible: bool,
    },
    Image {
        #[serde(default)]
        src: Option<String>,
        #[serde(default, rename = "scaleMode")]
        scale_mode: ScaleMode,
        #[serde(default = "visible_default")]
        visible: bool,
    },
    Gradient {
        #[serde(default)]
        kind: GradientKind,
        #[serde(default)]
        angle: Option<f64>,
        #[serde(default)]
        stops: Vec<GradientStop>,
        #[serde(default = "visible_default")]
        visible: bool,
    },
    None,
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        match self {
            Paint::Solid { visible, .. }
            | Paint::Image { visible, .. }
            | Paint::Gradient { visible, .. } => *visible,
            Paint::None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stroke {
    pub color: String,
    #[serde(default = "default_stroke_weight")]
    pub weight: f64,
    #[serde(default)]
    pub dashed: bool,
}

fn default_stroke_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    pub fn uniform(&self) -> Option<f64> {
        let r = self.top_left;
        (self.top_right == r && self.bottom_right == r && self.bottom_left == r).then_some(r)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    pub inset: bool,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            blur: 0.0,
            spread: 0.0,
            color: "#00000040".to_string(),
            inset: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

/// Typography and content of a text node
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextPayload {
    pub characters: String,
    pub family: Option<String>,
    pub size: Option<f64>,
    pub weight: Option<u16>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub color: Option<String>,
    pub italic: bool,
    pub uppercase: bool,
    pub decoration: TextDecoration,
    pub align: TextAlign,
}

/// Prototype interaction attached to a node
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Action {
    pub open_url: Option<String>,
    pub is_clickable: bool,
}

impl Action {
    pub fn is_signal(&self) -> bool {
        self.is_clickable || self.open_url.is_some()
    }
}

/// Content recovered from a component instance's overrides
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstancePayload {
    pub cta_label: Option<String>,
    pub text_runs: Vec<String>,
}

/// One node of the design tree
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub absolute_bounding_box: Option<Rect>,
    pub auto: Option<AutoLayout>,
    pub sizing: Option<ChildSizing>,
    pub fills: Vec<Paint>,
    pub stroke: Option<Stroke>,
    pub radii: Option<CornerRadii>,
    pub shadows: Vec<Shadow>,
    pub opacity: Option<f64>,
    pub blend_mode: Option<String>,
    pub blur: Option<f64>,
    pub clips_content: bool,
    pub text: Option<TextPayload>,
    pub svg: Option<String>,
    pub action: Option<Action>,
    pub instance: Option<InstancePayload>,
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    /// Create a frame node with the given id and name
    pub fn frame(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Frame,
            ..Self::default()
        }
    }

    /// Create a text node
    pub fn text(id: impl Into<String>, name: impl Into<String>, characters: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Text,
            text: Some(TextPayload {
                characters: characters.to_string(),
                ..TextPayload::default()
            }),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, w: f64, h: f64) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.auto.get_or_insert_with(AutoLayout::default).layout = layout;
        self
    }

    pub fn with_sizing(mut self, primary: Sizing, counter: Sizing) -> Self {
        self.sizing = Some(ChildSizing {
            primary,
            counter,
            align: None,
        });
        self
    }

    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.fills.push(paint);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_children(mut self, children: Vec<DesignNode>) -> Self {
        self.children = children;
        self
    }

    /// Width, falling back to the absolute bounding box
    pub fn width(&self) -> Option<f64> {
        self.w
            .or_else(|| self.absolute_bounding_box.map(|b| b.width))
    }

    /// Height, falling back to the absolute bounding box
    pub fn height(&self) -> Option<f64> {
        self.h
            .or_else(|| self.absolute_bounding_box.map(|b| b.height))
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.auto.as_ref().map(|a| a.layout).unwrap_or_default()
    }

    pub fn is_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn visible_fills(&self) -> impl DoubleEndedIterator<Item = &Paint> {
        self.fills.iter().filter(|p| p.is_visible())
    }

    pub fn image_fill(&self) -> Option<&Paint> {
        self.visible_fills()
            .find(|p| matches!(p, Paint::Image { .. }))
    }

    pub fn has_gradient_fill(&self) -> bool {
        self.visible_fills()
            .any(|p| matches!(p, Paint::Gradient { .. }))
    }

    pub fn has_only_solid_fills(&self) -> bool {
        let mut visible = self.visible_fills().peekable();
        visible.peek().is_some() && visible.all(|p| matches!(p, Paint::Solid { .. }))
    }

    /// Media: an image fill, a vector payload, or a vector-kind drawing
    pub fn is_media(&self) -> bool {
        self.image_fill().is_some() || self.svg.is_some() || self.kind.is_vector()
    }

    pub fn contains_media(&self) -> bool {
        self.is_media() || self.children.iter().any(DesignNode::contains_media)
    }

    pub fn contains_text(&self) -> bool {
        self.is_text() || self.children.iter().any(DesignNode::contains_text)
    }

    /// A text node, or a container whose leaves are all text
    pub fn is_text_dominant(&self) -> bool {
        if self.is_text() {
            return true;
        }
        !self.children.is_empty()
            && !self.contains_media()
            && self.children.iter().all(DesignNode::is_text_dominant)
    }

    /// First non-empty text found by a depth-first, pre-order search
    pub fn first_descendant_text(&self) -> Option<&DesignNode> {
        for child in &self.children {
            if let Some(text) = &child.text {
                if !text.characters.trim().is_empty() {
                    return Some(child);
                }
            }
            if let Some(found) = child.first_descendant_text() {
                return Some(found);
            }
        }
        None
    }

    pub fn text_descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| usize::from(c.is_text()) + c.text_descendant_count())
            .sum()
    }
}
