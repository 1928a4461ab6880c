//! Error types for layout inference

use thiserror::Error;

/// Errors that can occur while rendering a design tree
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The export carried no root node
    #[error("design tree has no root node")]
    MissingTree,

    /// A configured heuristic pattern does not compile
    #[error("invalid {name} pattern: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}
