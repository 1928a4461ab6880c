//! Fold viewport fragments into one DOM with bucket-prefixed overrides

use std::collections::BTreeMap;

use tracing::debug;

use crate::markup::{ClassList, ClassToken, Document, Rewriter};

use super::error::ReconcileError;
use super::keys::{primary_keys, secondary_keys};
use super::{parse_fragment, ResponsiveFragments, Viewport};

/// Variant prefix that applies a token only inside the viewport's bucket
pub fn bucket_prefix(viewport: Viewport) -> String {
    format!(r#"[[data-bucket="{}"]_&]:"#, viewport)
}

/// Pair each variant element with at most one base element. Every primary
/// key claims its base element before any secondary key is tried, so a
/// text match never steals an element a later key names exactly.
fn match_elements(base: &Document<'_>, variant: &Document<'_>) -> Vec<(usize, usize)> {
    let base_primary = primary_keys(base);
    let base_secondary = secondary_keys(base);
    let variant_primary = primary_keys(variant);
    let variant_secondary = secondary_keys(variant);

    let mut taken = vec![false; base.len()];
    let mut matched: Vec<Option<usize>> = vec![None; variant.len()];
    for (j, slot) in matched.iter_mut().enumerate() {
        if let Some(b) = (0..base.len()).find(|&b| !taken[b] && base_primary[b] == variant_primary[j]) {
            taken[b] = true;
            *slot = Some(b);
        }
    }
    for (j, slot) in matched.iter_mut().enumerate() {
        if slot.is_some() {
            continue;
        }
        let Some(key) = variant_secondary[j].as_ref() else { continue };
        if let Some(b) = (0..base.len()).find(|&b| !taken[b] && base_secondary[b].as_ref() == Some(key)) {
            taken[b] = true;
            *slot = Some(b);
        }
    }

    matched
        .into_iter()
        .enumerate()
        .filter_map(|(j, b)| b.map(|b| (b, j)))
        .collect()
}

/// Tokens queued for one base element, in application order
#[derive(Debug, Default)]
struct Additions(Vec<(Viewport, String)>);

impl Additions {
    fn add(&mut self, viewport: Viewport, token: &ClassToken<'_>) {
        if !token.has_media_variant() {
            self.0.push((viewport, format!("{}{}", bucket_prefix(viewport), token.raw)));
            return;
        }
        // A later viewport replaces an earlier one's explicit media token
        // for the same variant and property
        let clash = self.0.iter().position(|(v, raw)| {
            let other = ClassToken::new(raw);
            *v != viewport
                && other.variant == token.variant
                && other.family() == token.family()
        });
        match clash {
            Some(i) => self.0[i] = (viewport, token.raw.to_string()),
            None => self.0.push((viewport, token.raw.to_string())),
        }
    }
}

/// Merge tablet then mobile differences onto the desktop fragment (or the
/// largest fragment present)
pub fn merge_responsive_fragments(fragments: &ResponsiveFragments) -> Result<String, ReconcileError> {
    let Some(base) = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile]
        .into_iter()
        .find(|v| fragments.get(*v).is_some())
    else {
        return Ok(String::new());
    };
    let base_html = fragments.get(base).unwrap_or_default();
    let base_doc = parse_fragment(base, base_html)?;

    let mut additions: BTreeMap<usize, Additions> = BTreeMap::new();
    for viewport in [Viewport::Tablet, Viewport::Mobile] {
        if viewport == base {
            continue;
        }
        let Some(html) = fragments.get(viewport) else { continue };
        let doc = parse_fragment(viewport, html)?;
        let pairs = match_elements(&base_doc, &doc);
        debug!(
            %viewport,
            matched = pairs.len(),
            unmatched = doc.len() - pairs.len(),
            "matched variant elements"
        );
        for (b, j) in pairs {
            let base_classes = base_doc.node(b).classes();
            let variant_classes = doc.node(j).classes();
            for token in variant_classes.iter().filter(|t| !base_classes.contains(t.raw)) {
                additions.entry(b).or_default().add(viewport, &token);
            }
        }
    }

    let mut rewriter = Rewriter::new(&base_doc);
    for (b, queued) in additions {
        rewriter.update_classes(b, |c: &mut ClassList| {
            c.extend(queued.0.into_iter().map(|(_, raw)| raw));
        });
    }
    Ok(rewriter
        .finish()
        .map_err(|source| ReconcileError::Markup {
            viewport: base,
            source,
        })?
        .html)
}
