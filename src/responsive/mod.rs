//! Responsive variant reconciliation
//!
//! Mobile, tablet, and desktop frames are exported and rendered
//! independently. When their element keys and order agree closely enough
//! the fragments are merged into one DOM whose per-viewport differences are
//! expressed as bucket-prefixed utilities; otherwise each fragment is kept
//! and shown only inside its own bucket.

pub mod config;
pub mod error;
pub mod keys;
pub mod merge;
pub mod strategy;

use crate::inference::builder::{Element, HtmlBuilder};
use crate::markup::{ClassList, Document};

pub use crate::design::Viewport;
pub use config::ReconcileConfig;
pub use error::ReconcileError;
pub use merge::{bucket_prefix, merge_responsive_fragments};
pub use strategy::{decide_responsive_strategy, Strategy, StrategyDecision, VariantScore};

/// Rendered markup per viewport; any subset may be present
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponsiveFragments {
    pub mobile: Option<String>,
    pub tablet: Option<String>,
    pub desktop: Option<String>,
}

impl ResponsiveFragments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mobile(mut self, html: impl Into<String>) -> Self {
        self.mobile = Some(html.into());
        self
    }

    pub fn with_tablet(mut self, html: impl Into<String>) -> Self {
        self.tablet = Some(html.into());
        self
    }

    pub fn with_desktop(mut self, html: impl Into<String>) -> Self {
        self.desktop = Some(html.into());
        self
    }

    pub fn get(&self, viewport: Viewport) -> Option<&str> {
        match viewport {
            Viewport::Mobile => self.mobile.as_deref(),
            Viewport::Tablet => self.tablet.as_deref(),
            Viewport::Desktop => self.desktop.as_deref(),
        }
    }

    /// Present fragments, smallest viewport first
    pub fn present(&self) -> Vec<(Viewport, &str)> {
        Viewport::ALL
            .into_iter()
            .filter_map(|v| self.get(v).map(|html| (v, html)))
            .collect()
    }
}

pub(crate) fn parse_fragment(viewport: Viewport, html: &str) -> Result<Document<'_>, ReconcileError> {
    Document::parse(html).map_err(|source| ReconcileError::Markup { viewport, source })
}

/// Fragments kept side by side, each visible only in its bucket
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportSet(pub Vec<(Viewport, String)>);

impl ViewportSet {
    pub fn to_html(&self) -> String {
        let mut builder = HtmlBuilder::new(true);
        for (viewport, html) in &self.0 {
            let classes = ClassList::parse(&format!("hidden {}block", bucket_prefix(*viewport)));
            builder.open(
                &Element::new("div")
                    .attr("data-viewport", viewport.as_str())
                    .with_classes(classes),
            );
            builder.raw(html);
            builder.close("div");
        }
        builder.finish()
    }
}

/// Outcome of reconciling a set of fragments
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// Zero or one fragment, passed through
    Single(Option<String>),
    Merged(String),
    Swap(ViewportSet),
}

impl Reconciled {
    /// Final markup for any outcome
    pub fn to_html(&self) -> String {
        match self {
            Reconciled::Single(html) => html.clone().unwrap_or_default(),
            Reconciled::Merged(html) => html.clone(),
            Reconciled::Swap(set) => set.to_html(),
        }
    }
}

/// Decide a strategy and apply it
pub fn reconcile(
    fragments: &ResponsiveFragments,
    config: &ReconcileConfig,
) -> Result<(Reconciled, StrategyDecision), ReconcileError> {
    let decision = decide_responsive_strategy(fragments, config)?;
    let reconciled = match decision.strategy {
        Strategy::Single => Reconciled::Single(
            fragments
                .present()
                .first()
                .map(|(_, html)| html.to_string()),
        ),
        Strategy::Merge => Reconciled::Merged(merge_responsive_fragments(fragments)?),
        Strategy::Swap => Reconciled::Swap(ViewportSet(
            fragments
                .present()
                .into_iter()
                .map(|(v, html)| (v, html.to_string()))
                .collect(),
        )),
    };
    Ok((reconciled, decision))
}
