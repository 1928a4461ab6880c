//! Design tree input model
//!
//! The tree is produced by an external exporter and is read-only to the
//! rest of the crate.

pub mod node;
pub mod semantics;

pub use node::*;
pub use semantics::{FontMap, SemanticOverride, SemanticsMap};

use serde::{Deserialize, Serialize};

/// Target viewport of an exported frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Mobile,
    Tablet,
    Desktop,
}

impl Viewport {
    /// Smallest first
    pub const ALL: [Viewport; 3] = [Viewport::Mobile, Viewport::Tablet, Viewport::Desktop];

    pub fn as_str(self) -> &'static str {
        match self {
            Viewport::Mobile => "mobile",
            Viewport::Tablet => "tablet",
            Viewport::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One export: the tree plus its semantic overrides
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DesignExport {
    pub root: Option<DesignNode>,
    pub semantics: SemanticsMap,
    pub viewport: Option<Viewport>,
}

impl DesignExport {
    pub fn new(root: DesignNode) -> Self {
        Self {
            root: Some(root),
            ..Self::default()
        }
    }

    pub fn with_semantics(mut self, semantics: SemanticsMap) -> Self {
        self.semantics = semantics;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }
}
