//! Utility-class tokens: `[variant:]base`, where `base` may carry a
//! bracketed arbitrary value and variants may themselves contain brackets.

use std::fmt;

/// Min-width breakpoints in ascending order
pub const BREAKPOINTS: &[&str] = &["sm", "md", "lg", "xl", "2xl"];

/// A borrowed view of one class token split into variant and base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassToken<'a> {
    pub raw: &'a str,
    /// Everything before the last top-level colon; empty when unprefixed
    pub variant: &'a str,
    pub base: &'a str,
}

impl<'a> ClassToken<'a> {
    pub fn new(raw: &'a str) -> Self {
        let (variant, base) = split_variant(raw);
        Self { raw, variant, base }
    }

    pub fn is_unprefixed(&self) -> bool {
        self.variant.is_empty()
    }

    /// Any `w-*` utility
    pub fn is_width(&self) -> bool {
        self.base.starts_with("w-")
    }

    /// `w-[..]`, `w-12`, `w-px`
    pub fn is_literal_width(&self) -> bool {
        self.base
            .strip_prefix("w-")
            .map(is_literal_size)
            .unwrap_or(false)
    }

    /// A width whose value is an arbitrary bracket
    pub fn is_bracket_width(&self) -> bool {
        self.base.starts_with("w-[")
    }

    /// Any `h-*` utility; `min-h-*`/`max-h-*` are not heights
    pub fn is_height(&self) -> bool {
        self.base.starts_with("h-")
    }

    pub fn is_literal_height(&self) -> bool {
        self.base
            .strip_prefix("h-")
            .map(is_literal_size)
            .unwrap_or(false)
    }

    pub fn is_background_image(&self) -> bool {
        self.base.starts_with("bg-[url(")
            || self.base.starts_with("bg-[image:")
            || self.base.starts_with("bg-[linear-gradient(")
            || self.base.starts_with("bg-[radial-gradient(")
            || self.base.starts_with("bg-gradient-")
    }

    /// Value inside a trailing `[...]`, if any
    pub fn bracket_value(&self) -> Option<&'a str> {
        bracket_value(self.base)
    }

    /// Min-width breakpoint of the variant, if it is exactly one
    pub fn breakpoint(&self) -> Option<&'a str> {
        BREAKPOINTS.iter().copied().find(|bp| *bp == self.variant)
    }

    /// Variant is a breakpoint or media condition rather than a state
    pub fn has_media_variant(&self) -> bool {
        self.variant.split(':').any(|v| {
            BREAKPOINTS.contains(&v)
                || v.starts_with("max-")
                || v.starts_with("min-[")
                || v.starts_with("@media")
                || matches!(v, "print" | "portrait" | "landscape" | "motion-safe" | "motion-reduce")
        })
    }

    /// Property family used to compare responsive tokens: the base minus
    /// its last top-level `-segment`
    pub fn family(&self) -> &'a str {
        utility_family(self.base)
    }
}

fn is_literal_size(rest: &str) -> bool {
    rest.starts_with('[')
        || rest == "px"
        || (rest.starts_with(|c: char| c.is_ascii_digit()) && !rest.contains('/'))
}

/// Split a token at its last colon outside brackets and parentheses
pub fn split_variant(token: &str) -> (&str, &str) {
    let mut depth = 0i32;
    let mut split = None;
    for (i, c) in token.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ':' if depth == 0 => split = Some(i),
            _ => {}
        }
    }
    match split {
        Some(i) => (&token[..i], &token[i + 1..]),
        None => ("", token),
    }
}

/// Contents of a trailing bracket group: `w-[33.5rem]` -> `33.5rem`
pub fn bracket_value(base: &str) -> Option<&str> {
    if !base.ends_with(']') {
        return None;
    }
    let start = base.find('[')?;
    Some(&base[start + 1..base.len() - 1])
}

/// Base without its value segment: `flex-col` -> `flex`, `py-[40px]` -> `py`
pub fn utility_family(base: &str) -> &str {
    let mut depth = 0i32;
    let mut cut = None;
    for (i, c) in base.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            '-' if depth == 0 && i > 0 => {
                cut = Some(i);
                if base[i + 1..].starts_with('[') {
                    break;
                }
            }
            _ => {}
        }
    }
    match cut {
        Some(i) => &base[..i],
        None => base,
    }
}

/// Parse a pixel value: `40px`, `40`, `2.5px`
pub fn parse_px(value: &str) -> Option<f64> {
    value.strip_suffix("px").unwrap_or(value).parse().ok()
}

/// Format a number without trailing zeros, rounded to two decimals
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Ordered, owned list of class tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(attr: &str) -> Self {
        Self(attr.split_whitespace().map(str::to_string).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ClassToken<'_>> {
        self.0.iter().map(|t| ClassToken::new(t))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Unprefixed token present
    pub fn has_base(&self, base: &str) -> bool {
        self.contains(base)
    }

    pub fn position(&self, token: &str) -> Option<usize> {
        self.0.iter().position(|t| t == token)
    }

    /// Append if absent; returns whether the list changed
    pub fn ensure(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.contains(&token) {
            return false;
        }
        self.0.push(token);
        true
    }

    /// Insert if absent at `index` (clamped); returns whether the list changed
    pub fn ensure_at(&mut self, index: usize, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.contains(&token) {
            return false;
        }
        let index = index.min(self.0.len());
        self.0.insert(index, token);
        true
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for t in tokens {
            self.ensure(t);
        }
    }

    /// Keep tokens matching the predicate; returns the index of the first removal
    pub fn retain(&mut self, mut keep: impl FnMut(&ClassToken<'_>) -> bool) -> Option<usize> {
        self.retain_indexed(|_, t| keep(t))
    }

    /// Like `retain`, but the predicate also sees each token's original index
    pub fn retain_indexed(
        &mut self,
        mut keep: impl FnMut(usize, &ClassToken<'_>) -> bool,
    ) -> Option<usize> {
        let mut first_removed = None;
        let mut original = 0;
        let mut kept_count = 0;
        self.0.retain(|t| {
            let kept = keep(original, &ClassToken::new(t));
            original += 1;
            if kept {
                kept_count += 1;
            } else if first_removed.is_none() {
                first_removed = Some(kept_count);
            }
            kept
        });
        first_removed
    }

    /// Index of the last token matching the predicate
    pub fn last_position(&self, mut pred: impl FnMut(&ClassToken<'_>) -> bool) -> Option<usize> {
        self.iter()
            .enumerate()
            .filter(|(_, t)| pred(t))
            .map(|(i, _)| i)
            .last()
    }

    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != token);
        self.0.len() != before
    }

    /// Replace the token at `index` in place
    pub fn replace_at(&mut self, index: usize, token: impl Into<String>) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = token.into();
        }
    }

    /// Drop exact duplicates, keeping first occurrences
    pub fn dedupe(&mut self) -> bool {
        let before = self.0.len();
        let mut seen: Vec<String> = Vec::with_capacity(before);
        self.0.retain(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(t.clone());
                true
            }
        });
        self.0.len() != before
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl IntoIterator for ClassList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S: Into<String>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ClassList::new();
        list.extend(iter);
        list
    }
}
