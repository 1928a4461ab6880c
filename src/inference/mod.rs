//! Layout inference: design tree to utility-class markup
//!
//! Each node is visited once, depth first. Per node the engine decides the
//! container model (grid or flex), maps per-axis sizing to utilities,
//! derives decoration, and synthesizes buttons and links. Every element is
//! tagged with `data-w-intent`/`data-h-intent`, which later rewrite passes
//! trust instead of re-deriving intent from classes.

pub mod background;
pub mod builder;
pub mod config;
pub mod decoration;
pub mod engine;
pub mod error;
pub mod grid;
pub mod interactive;
pub mod sizing;
pub mod typography;

pub use config::{Heuristics, InferenceConfig};
pub use engine::{InferenceEngine, ROOT_KEY};
pub use error::InferenceError;
pub use sizing::{AxisIntents, Intent};

use crate::design::{DesignNode, FontMap, SemanticsMap};

/// Render a design tree with the default configuration
pub fn render(
    tree: Option<&DesignNode>,
    semantics: &SemanticsMap,
    fonts: &FontMap,
) -> Result<String, InferenceError> {
    render_with_config(tree, semantics, fonts, InferenceConfig::default())
}

/// Render a design tree with custom configuration
pub fn render_with_config(
    tree: Option<&DesignNode>,
    semantics: &SemanticsMap,
    fonts: &FontMap,
    config: InferenceConfig,
) -> Result<String, InferenceError> {
    InferenceEngine::new(config, semantics, fonts)?.render(tree)
}
