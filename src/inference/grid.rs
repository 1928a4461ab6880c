//! Grid versus flex container decision

use crate::design::{DesignNode, LayoutMode};

use super::config::{Heuristics, InferenceConfig};

/// Explicit column count encoded in a node name, limited to 2..=6
pub fn column_hint(name: &str, heuristics: &Heuristics) -> Option<usize> {
    let caps = heuristics.column_hint.captures(name)?;
    let digits = (1..caps.len()).find_map(|i| caps.get(i))?;
    let cols: usize = digits.as_str().parse().ok()?;
    (2..=6).contains(&cols).then_some(cols)
}

/// Decide whether a container lays out its flow children as a grid.
///
/// Rules apply in order and the first decisive one wins:
/// vertical stacks are never grids, CTA-heavy rows stay flex, an explicit
/// column hint forces a grid, textual groups stay flex, and otherwise the
/// children must have near-equal widths.
pub fn should_use_grid(
    node: &DesignNode,
    children: &[&DesignNode],
    config: &InferenceConfig,
    heuristics: &Heuristics,
    is_cta: impl Fn(&DesignNode) -> bool,
) -> bool {
    if node.layout_mode() == LayoutMode::Vertical {
        return false;
    }

    let count = children.len();
    if count > 0 {
        let ctas = children.iter().filter(|c| is_cta(c)).count();
        if ratio(ctas, count) >= config.cta_grid_block_ratio {
            return false;
        }
    }

    if column_hint(&node.name, heuristics).is_some() {
        return true;
    }

    if count > 0 {
        let textual = children.iter().filter(|c| c.is_text_dominant()).count();
        let media = children.iter().filter(|c| c.contains_media()).count();
        if ratio(textual, count) >= config.textual_group_ratio && media == 0 {
            return false;
        }
    }

    if count < 2 {
        return false;
    }
    let Some(widths) = children.iter().map(|c| c.width()).collect::<Option<Vec<f64>>>() else {
        return false;
    };

    let min = widths.iter().copied().fold(f64::INFINITY, f64::min);
    let max = widths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min <= 0.0 {
        return false;
    }
    let limit = if count >= 4 {
        config.grid_ratio_large
    } else {
        config.grid_ratio_small
    };
    max / min <= limit
}

/// Column count at the widest breakpoint
pub fn grid_cols_for(node: &DesignNode, count: usize, heuristics: &Heuristics) -> usize {
    if let Some(cols) = column_hint(&node.name, heuristics) {
        return cols;
    }
    match count {
        2 => 2,
        3 => 3,
        n if n >= 6 => 4,
        n if n >= 4 => 3,
        _ => 2,
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignNode;

    fn row(name: &str, widths: &[f64]) -> DesignNode {
        let children = widths
            .iter()
            .enumerate()
            .map(|(i, w)| DesignNode::frame(format!("c{i}"), format!("Card {i}")).with_size(*w, 200.0))
            .collect();
        DesignNode::frame("row", name)
            .with_layout(LayoutMode::Horizontal)
            .with_children(children)
    }

    fn decide(node: &DesignNode) -> bool {
        let config = InferenceConfig::default();
        let heuristics = config.heuristics().unwrap();
        let children: Vec<&DesignNode> = node.children.iter().collect();
        should_use_grid(node, &children, &config, &heuristics, |_| false)
    }

    #[test]
    fn test_near_equal_widths_select_grid() {
        assert!(decide(&row("Cards", &[300.0, 320.0])));
    }

    #[test]
    fn test_unequal_widths_select_flex() {
        assert!(!decide(&row("Cards", &[300.0, 500.0])));
    }

    #[test]
    fn test_larger_groups_use_relaxed_ratio() {
        assert!(decide(&row("Cards", &[300.0, 340.0, 320.0, 310.0])));
        assert!(!decide(&row("Cards", &[300.0, 340.0, 320.0])));
    }

    #[test]
    fn test_vertical_is_never_grid() {
        let node = row("3 columns", &[300.0, 300.0, 300.0]).with_layout(LayoutMode::Vertical);
        assert!(!decide(&node));
    }

    #[test]
    fn test_column_hint_forces_grid() {
        assert!(decide(&row("Features 3 cols", &[100.0, 400.0])));
    }

    #[test]
    fn test_cta_pair_stays_flex() {
        let config = InferenceConfig::default();
        let heuristics = config.heuristics().unwrap();
        let node = row("Actions", &[160.0, 160.0]);
        let children: Vec<&DesignNode> = node.children.iter().collect();
        assert!(!should_use_grid(&node, &children, &config, &heuristics, |_| true));
    }

    #[test]
    fn test_textual_group_stays_flex() {
        let node = DesignNode::frame("row", "Copy")
            .with_layout(LayoutMode::Horizontal)
            .with_children(vec![
                DesignNode::text("a", "A", "one").with_size(200.0, 20.0),
                DesignNode::text("b", "B", "two").with_size(200.0, 20.0),
            ]);
        assert!(!decide(&node));
    }

    #[test]
    fn test_missing_width_is_flex() {
        let mut node = row("Cards", &[300.0, 300.0]);
        node.children[1].w = None;
        assert!(!decide(&node));
    }

    #[test]
    fn test_grid_cols_for() {
        let heuristics = InferenceConfig::default().heuristics().unwrap();
        let plain = DesignNode::frame("x", "Cards");
        assert_eq!(grid_cols_for(&plain, 2, &heuristics), 2);
        assert_eq!(grid_cols_for(&plain, 3, &heuristics), 3);
        assert_eq!(grid_cols_for(&plain, 4, &heuristics), 3);
        assert_eq!(grid_cols_for(&plain, 5, &heuristics), 3);
        assert_eq!(grid_cols_for(&plain, 8, &heuristics), 4);
        assert_eq!(grid_cols_for(&plain, 1, &heuristics), 2);
        let hinted = DesignNode::frame("y", "grid-5");
        assert_eq!(grid_cols_for(&hinted, 2, &heuristics), 5);
    }

    #[test]
    fn test_column_hint_range() {
        let heuristics = InferenceConfig::default().heuristics().unwrap();
        assert_eq!(column_hint("Pricing 4 columns", &heuristics), Some(4));
        assert_eq!(column_hint("cols-2", &heuristics), Some(2));
        assert_eq!(column_hint("9 cols", &heuristics), None);
        assert_eq!(column_hint("Column", &heuristics), None);
    }
}
