//! Tag scanner for emitted markup using logos
//!
//! Only the shapes of markup this crate produces are recognized: tags with
//! quoted or bare attribute values, comments, doctypes, and text runs.

use logos::Logos;

use crate::error::{MarkupError, Span};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToken {
    #[regex(r"<!--([^-]|-[^-])*-->")]
    Comment,

    #[regex(r"<![A-Za-z][^>]*>")]
    Doctype,

    #[regex(r#"<[A-Za-z][A-Za-z0-9-]*([ \t\r\n]+[^ \t\r\n"'>/=]+([ \t\r\n]*=[ \t\r\n]*("[^"]*"|'[^']*'|[^ \t\r\n"'=<>`]+))?)*[ \t\r\n]*/?>"#)]
    OpenTag,

    #[regex(r"</[A-Za-z][A-Za-z0-9-]*[ \t\r\n]*>")]
    CloseTag,

    #[regex(r"[^<]+")]
    Text,
}

/// Scan markup into tokens with spans, failing on the first unrecognized byte
pub fn scan(input: &str) -> Result<Vec<(MarkupToken, Span)>, MarkupError> {
    MarkupToken::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(MarkupError::UnexpectedChar { span }),
        })
        .collect()
}
