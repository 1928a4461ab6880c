//! Error types for responsive reconciliation

use thiserror::Error;

use crate::error::MarkupError;

use super::Viewport;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A viewport fragment is not balanced markup
    #[error("{viewport} fragment: {source}")]
    Markup {
        viewport: Viewport,
        #[source]
        source: MarkupError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_viewport() {
        let err = ReconcileError::Markup {
            viewport: Viewport::Tablet,
            source: MarkupError::Unclosed {
                tag: "div".to_string(),
                span: 0..5,
            },
        };
        assert!(err.to_string().starts_with("tablet fragment:"));
    }
}
