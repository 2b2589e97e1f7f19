//! Restricted Markdown parser for the mdraster renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Block tokenizer** - ATX headings, thematic breaks, paragraph lines and
//!   blank lines, one token per source line
//! - **Inline tokenizer** - code spans, strong emphasis and emphasis
//! - **Tree builder** - paragraphs from consecutive lines, joined by hard
//!   line breaks, appended to a [`mdraster_dom::Document`]
//!
//! # Not Supported
//!
//! Lists, block quotes, fenced code, tables, links and images are kept as
//! literal paragraph text; the parser records an issue for them.

/// Markdown tree construction.
pub mod parser;
/// Line and inline tokenizers.
pub mod tokenizer;

pub use parser::{MarkdownParser, ParseIssue, parse, parse_inline_text};
pub use tokenizer::{BlockToken, BlockTokenizer, UnsupportedSyntax};
