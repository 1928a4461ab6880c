//! Error types for markup scanning and patching

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkupError {
    #[error("unexpected character at {span:?}")]
    UnexpectedChar { span: Span },

    #[error("closing tag </{tag}> at {span:?} has no open element")]
    UnexpectedClose { tag: String, span: Span },

    #[error("closing tag </{found}> at {span:?} does not match open <{expected}>")]
    MismatchedClose {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("element <{tag}> opened at {span:?} is never closed")]
    Unclosed { tag: String, span: Span },

    #[error("patches {first:?} and {second:?} overlap")]
    OverlappingPatches { first: Span, second: Span },
}

impl MarkupError {
    pub fn span(&self) -> &Span {
        match self {
            MarkupError::UnexpectedChar { span }
            | MarkupError::UnexpectedClose { span, .. }
            | MarkupError::MismatchedClose { span, .. }
            | MarkupError::Unclosed { span, .. } => span,
            MarkupError::OverlappingPatches { second, .. } => second,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let span = self.span().clone();
        let message = self.to_string();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(message.clone())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}
