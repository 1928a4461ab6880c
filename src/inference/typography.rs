//! Text utilities

use crate::design::{FontMap, Paint, TextAlign, TextDecoration, TextPayload};
use crate::markup::classes::{format_number, ClassList};

fn weight_class(weight: u16) -> String {
    let name = match weight {
        100 => "thin",
        200 => "extralight",
        300 => "light",
        400 => "normal",
        500 => "medium",
        600 => "semibold",
        700 => "bold",
        800 => "extrabold",
        900 => "black",
        other => return format!("font-[{}]", other),
    };
    format!("font-{}", name)
}

/// Typography utilities for a text payload. `fills` supplies the color when
/// the payload carries none.
pub fn text_classes(text: &TextPayload, fills: &[Paint], fonts: &FontMap) -> ClassList {
    let mut classes = ClassList::new();

    if let Some(family) = &text.family {
        if let Some(class) = fonts.class_for(family) {
            classes.push(class);
        }
    }
    if let Some(size) = text.size {
        classes.push(format!("text-[{}px]", format_number(size)));
    }
    if let Some(weight) = text.weight {
        classes.push(weight_class(weight));
    }
    if let Some(line_height) = text.line_height {
        classes.push(format!("leading-[{}px]", format_number(line_height)));
    }
    if let Some(spacing) = text.letter_spacing {
        if spacing != 0.0 {
            classes.push(format!("tracking-[{}px]", format_number(spacing)));
        }
    }

    let fill_color = fills.iter().rev().find_map(|p| match p {
        Paint::Solid { color, visible: true, .. } => Some(color),
        _ => None,
    });
    if let Some(color) = text.color.as_ref().or(fill_color) {
        classes.push(format!("text-[{}]", color));
    }

    if text.italic {
        classes.push("italic");
    }
    if text.uppercase {
        classes.push("uppercase");
    }
    match text.decoration {
        TextDecoration::Underline => classes.push("underline"),
        TextDecoration::Strikethrough => classes.push("line-through"),
        TextDecoration::None => {}
    }
    match text.align {
        TextAlign::Center => classes.push("text-center"),
        TextAlign::Right => classes.push("text-right"),
        TextAlign::Justified => classes.push("text-justify"),
        TextAlign::Left => {}
    }
    if text.characters.contains('\n') {
        classes.push("whitespace-pre-line");
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload() {
        let text = TextPayload {
            characters: "Line one\nLine two".into(),
            family: Some("inter".into()),
            size: Some(32.0),
            weight: Some(700),
            line_height: Some(40.0),
            letter_spacing: Some(-0.5),
            color: Some("#111827".into()),
            italic: true,
            uppercase: true,
            decoration: TextDecoration::Underline,
            align: TextAlign::Center,
        };
        let fonts = FontMap::new().with_family("Inter", "font-inter");
        assert_eq!(
            text_classes(&text, &[], &fonts).to_string(),
            "font-inter text-[32px] font-bold leading-[40px] tracking-[-0.5px] text-[#111827] \
             italic uppercase underline text-center whitespace-pre-line"
        );
    }

    #[test]
    fn test_color_from_fill_and_odd_weight() {
        let text = TextPayload {
            characters: "Hi".into(),
            weight: Some(450),
            ..TextPayload::default()
        };
        let fills = vec![Paint::Solid {
            color: "#ff0000".into(),
            opacity: None,
            visible: true,
        }];
        assert_eq!(
            text_classes(&text, &fills, &FontMap::new()).to_string(),
            "font-[450] text-[#ff0000]"
        );
    }

    #[test]
    fn test_unmapped_family_is_omitted() {
        let text = TextPayload {
            family: Some("Comic Sans".into()),
            size: Some(16.0),
            ..TextPayload::default()
        };
        assert_eq!(text_classes(&text, &[], &FontMap::new()).to_string(), "text-[16px]");
    }
}
