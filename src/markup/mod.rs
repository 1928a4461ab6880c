//! Lightweight markup IR shared by the contract engine and reconciliation
//!
//! This is not a general HTML parser: it understands balanced tags, void
//! elements, quoted attributes, comments, and text, which is everything the
//! inference engine emits.

pub mod classes;
pub mod lexer;
pub mod parser;
pub mod patch;
pub mod rewrite;

pub use classes::{
    bracket_value, format_number, parse_px, split_variant, utility_family, ClassList, ClassToken,
    BREAKPOINTS,
};
pub use parser::{escape_attribute, escape_text, Document, ParsedNode};
pub use patch::{apply_patches, Patch};
pub use rewrite::{Rewriter, Rewritten};
