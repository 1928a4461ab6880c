//! Positional text splices

use crate::error::MarkupError;

/// Replace `source[start..end]` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Patch {
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }
}

/// Apply non-overlapping patches in reverse document order so earlier
/// offsets stay valid
pub fn apply_patches(source: &str, mut patches: Vec<Patch>) -> Result<String, MarkupError> {
    patches.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    for pair in patches.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.end > later.start {
            return Err(MarkupError::OverlappingPatches {
                first: earlier.start..earlier.end,
                second: later.start..later.end,
            });
        }
    }

    let mut out = source.to_string();
    for patch in patches {
        out.replace_range(patch.start..patch.end, &patch.replacement);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_any_order() {
        let source = "<div><p>a</p></div>";
        let patches = vec![
            Patch::new(0, 5, r#"<div class="x">"#),
            Patch::new(8, 9, "b"),
        ];
        assert_eq!(
            apply_patches(source, patches).unwrap(),
            r#"<div class="x"><p>b</p></div>"#
        );
    }

    #[test]
    fn test_overlap_rejected() {
        let err = apply_patches("abcdef", vec![Patch::new(0, 3, "x"), Patch::new(2, 4, "y")]);
        assert!(matches!(err, Err(MarkupError::OverlappingPatches { .. })));
    }

    #[test]
    fn test_adjacent_patches_allowed() {
        let out = apply_patches("abcdef", vec![Patch::new(0, 3, "X"), Patch::new(3, 6, "Y")]);
        assert_eq!(out.unwrap(), "XY");
    }
}
