//! Paint, stroke, and effect utilities

use crate::design::{DesignNode, GradientKind, GradientStop, Paint, ScaleMode};
use crate::markup::classes::{format_number, ClassList};

/// Background utilities for a single paint
pub fn paint_classes(paint: &Paint, node: &DesignNode, placeholder_host: &str) -> ClassList {
    let mut classes = ClassList::new();
    match paint {
        Paint::Solid { color, opacity, .. } => {
            classes.push(format!("bg-[{}]", with_alpha(color, *opacity)));
        }
        Paint::Gradient {
            kind, angle, stops, ..
        } => {
            if let Some(gradient) = gradient_value(*kind, *angle, stops) {
                classes.push(format!("bg-[{}]", gradient));
            }
        }
        Paint::Image {
            src, scale_mode, ..
        } => {
            let url = match src {
                Some(src) if !src.is_empty() => src.clone(),
                _ => background_placeholder(node, placeholder_host),
            };
            classes.push(format!("bg-[url('{}')]", url.replace(' ', "%20")));
            classes.push(match scale_mode {
                ScaleMode::Fit => "bg-contain",
                _ => "bg-cover",
            });
            classes.extend(["bg-center", "bg-no-repeat"]);
        }
        Paint::None => {}
    }
    classes
}

/// The paint that wins: last visible gradient, else last visible solid,
/// else the image
pub fn dominant_fill(node: &DesignNode) -> Option<&Paint> {
    node.visible_fills()
        .rev()
        .find(|p| matches!(p, Paint::Gradient { .. }))
        .or_else(|| {
            node.visible_fills()
                .rev()
                .find(|p| matches!(p, Paint::Solid { .. }))
        })
        .or_else(|| node.image_fill())
}

/// Deterministic stand-in for a background image without a source
pub fn background_placeholder(node: &DesignNode, host: &str) -> String {
    format!("{}?text=bgImage", image_placeholder(node, host))
}

/// Deterministic stand-in for an `<img>` without a source
pub fn image_placeholder(node: &DesignNode, host: &str) -> String {
    let w = node.width().map(|w| w.round() as i64).unwrap_or(600);
    let h = node.height().map(|h| h.round() as i64).unwrap_or(400);
    format!("{}/{}x{}", host.trim_end_matches('/'), w, h)
}

/// Append an alpha channel for translucent solids
fn with_alpha(color: &str, opacity: Option<f64>) -> String {
    match opacity {
        Some(o) if o < 1.0 && color.len() == 7 && color.starts_with('#') => {
            let alpha = (o.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("{}{:02x}", color, alpha)
        }
        _ => color.to_string(),
    }
}

fn gradient_value(kind: GradientKind, angle: Option<f64>, stops: &[GradientStop]) -> Option<String> {
    if stops.is_empty() {
        return None;
    }
    let stops = stops
        .iter()
        .map(|s| format!("{}_{}%", s.color, format_number(s.position * 100.0)))
        .collect::<Vec<_>>()
        .join(",");
    Some(match kind {
        GradientKind::Linear => format!(
            "linear-gradient({}deg,{})",
            format_number(angle.unwrap_or(180.0)),
            stops
        ),
        GradientKind::Radial => format!("radial-gradient(circle,{})", stops),
    })
}

/// Stroke, radii, shadow, and effect utilities; fills are handled separately
pub fn decoration_classes(node: &DesignNode) -> ClassList {
    let mut classes = ClassList::new();

    if let Some(stroke) = &node.stroke {
        if stroke.weight > 0.0 {
            classes.push(format!("border-[{}px]", format_number(stroke.weight)));
            classes.push(format!("border-[{}]", stroke.color));
            if stroke.dashed {
                classes.push("border-dashed");
            }
        }
    }

    if let Some(radii) = &node.radii {
        match radii.uniform() {
            Some(r) if r > 0.0 => {
                let short_side = node.width().zip(node.height()).map(|(w, h)| w.min(h));
                match short_side {
                    Some(side) if r * 2.0 >= side => classes.push("rounded-full"),
                    _ => classes.push(format!("rounded-[{}px]", format_number(r))),
                }
            }
            Some(_) => {}
            None => {
                for (corner, r) in [
                    ("tl", radii.top_left),
                    ("tr", radii.top_right),
                    ("br", radii.bottom_right),
                    ("bl", radii.bottom_left),
                ] {
                    if r > 0.0 {
                        classes.push(format!("rounded-{}-[{}px]", corner, format_number(r)));
                    }
                }
            }
        }
    }

    if !node.shadows.is_empty() {
        let layers = node
            .shadows
            .iter()
            .map(|s| {
                format!(
                    "{}{}px_{}px_{}px_{}px_{}",
                    if s.inset { "inset_" } else { "" },
                    format_number(s.x),
                    format_number(s.y),
                    format_number(s.blur),
                    format_number(s.spread),
                    s.color
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        classes.push(format!("shadow-[{}]", layers));
    }

    if let Some(opacity) = node.opacity {
        if opacity < 1.0 {
            classes.push(format!("opacity-[{}]", format_number(opacity)));
        }
    }

    if let Some(mode) = &node.blend_mode {
        let mode = mode.to_ascii_lowercase().replace('_', "-");
        if !matches!(mode.as_str(), "normal" | "pass-through") {
            classes.push(format!("mix-blend-{}", mode));
        }
    }

    if let Some(blur) = node.blur {
        if blur > 0.0 {
            classes.push(format!("blur-[{}px]", format_number(blur)));
        }
    }

    if node.clips_content {
        classes.push("overflow-hidden");
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{CornerRadii, Shadow, Stroke};

    fn solid(color: &str) -> Paint {
        Paint::Solid {
            color: color.to_string(),
            opacity: None,
            visible: true,
        }
    }

    #[test]
    fn test_gradient_beats_solid() {
        let node = DesignNode::frame("n", "Box")
            .with_fill(solid("#ffffff"))
            .with_fill(Paint::Gradient {
                kind: GradientKind::Linear,
                angle: None,
                stops: vec![
                    GradientStop { color: "#fff".into(), position: 0.0 },
                    GradientStop { color: "#000".into(), position: 1.0 },
                ],
                visible: true,
            })
            .with_fill(solid("#ff0000"));
        let paint = dominant_fill(&node).unwrap();
        assert_eq!(
            paint_classes(paint, &node, "https://placehold.co").to_string(),
            "bg-[linear-gradient(180deg,#fff_0%,#000_100%)]"
        );
    }

    #[test]
    fn test_last_visible_solid_wins() {
        let hidden = Paint::Solid {
            color: "#00ff00".into(),
            opacity: None,
            visible: false,
        };
        let node = DesignNode::frame("n", "Box")
            .with_fill(solid("#111111"))
            .with_fill(solid("#222222"))
            .with_fill(hidden);
        let paint = dominant_fill(&node).unwrap();
        assert_eq!(paint_classes(paint, &node, "").to_string(), "bg-[#222222]");
    }

    #[test]
    fn test_solid_opacity_becomes_alpha() {
        let node = DesignNode::frame("n", "Box");
        let paint = Paint::Solid {
            color: "#000000".into(),
            opacity: Some(0.5),
            visible: true,
        };
        assert_eq!(paint_classes(&paint, &node, "").to_string(), "bg-[#00000080]");
    }

    #[test]
    fn test_image_placeholder_is_deterministic() {
        let node = DesignNode::frame("n", "Hero").with_size(1440.0, 720.0);
        let paint = Paint::Image {
            src: None,
            scale_mode: ScaleMode::Fill,
            visible: true,
        };
        assert_eq!(
            paint_classes(&paint, &node, "https://placehold.co/").to_string(),
            "bg-[url('https://placehold.co/1440x720?text=bgImage')] bg-cover bg-center bg-no-repeat"
        );
    }

    #[test]
    fn test_effects_map_independently() {
        let mut node = DesignNode::frame("n", "Card").with_size(320.0, 200.0);
        node.stroke = Some(Stroke {
            color: "#e5e7eb".into(),
            weight: 1.0,
            dashed: true,
        });
        node.radii = Some(CornerRadii {
            top_left: 12.0,
            top_right: 12.0,
            bottom_right: 12.0,
            bottom_left: 12.0,
        });
        node.shadows = vec![Shadow {
            y: 4.0,
            blur: 12.0,
            ..Shadow::default()
        }];
        node.opacity = Some(0.9);
        node.blend_mode = Some("MULTIPLY".into());
        node.blur = Some(4.0);
        node.clips_content = true;
        assert_eq!(
            decoration_classes(&node).to_string(),
            "border-[1px] border-[#e5e7eb] border-dashed rounded-[12px] \
             shadow-[0px_4px_12px_0px_#00000040] opacity-[0.9] mix-blend-multiply blur-[4px] overflow-hidden"
        );
    }

    #[test]
    fn test_pill_radius_and_corners() {
        let mut pill = DesignNode::frame("n", "Pill").with_size(120.0, 40.0);
        pill.radii = Some(CornerRadii {
            top_left: 20.0,
            top_right: 20.0,
            bottom_right: 20.0,
            bottom_left: 20.0,
        });
        assert_eq!(decoration_classes(&pill).to_string(), "rounded-full");

        let mut tab = DesignNode::frame("n", "Tab");
        tab.radii = Some(CornerRadii {
            top_left: 8.0,
            top_right: 8.0,
            ..CornerRadii::default()
        });
        assert_eq!(
            decoration_classes(&tab).to_string(),
            "rounded-tl-[8px] rounded-tr-[8px]"
        );
    }

    #[test]
    fn test_missing_fields_emit_nothing() {
        let node = DesignNode::frame("n", "Empty");
        assert!(decoration_classes(&node).is_empty());
        assert!(dominant_fill(&node).is_none());
    }
}
