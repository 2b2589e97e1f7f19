//! Tree construction from block tokens.
//!
//! Consecutive text lines form one paragraph; the line structure the author
//! typed is kept by joining lines with hard line breaks. Headings and
//! thematic breaks interrupt a paragraph, blank lines end it.

use mdraster_common::warning::warn_once;
use mdraster_dom::{Document, DocumentBuilder, Inline};
use strum::IntoEnumIterator;

use crate::tokenizer::{BlockToken, BlockTokenizer, UnsupportedSyntax, parse_inline};

/// A recoverable problem found while parsing.
///
/// Parsing never fails: every issue has a literal-text fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// 1-based source line.
    pub line: usize,
}

/// Builds a [`Document`] from Markdown source.
pub struct MarkdownParser<'a> {
    source: &'a str,
    builder: DocumentBuilder,
    issues: Vec<ParseIssue>,
    /// Lines of the paragraph being collected, with their line numbers.
    pending: Vec<(usize, String)>,
}

impl<'a> MarkdownParser<'a> {
    /// Create a parser over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            builder: DocumentBuilder::new(),
            issues: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Run the parser and return the document.
    #[must_use]
    pub fn run(self) -> Document {
        self.run_with_issues().0
    }

    /// Run the parser and return the document together with every issue.
    #[must_use]
    pub fn run_with_issues(mut self) -> (Document, Vec<ParseIssue>) {
        for (index, token) in BlockTokenizer::new(self.source).enumerate() {
            let line = index + 1;
            match token {
                BlockToken::Blank => self.flush_paragraph(),
                BlockToken::Heading { level, text } => {
                    self.flush_paragraph();
                    let content = self.inline(&text, line);
                    self.builder = std::mem::take(&mut self.builder).heading(level, content);
                }
                BlockToken::ThematicBreak => {
                    self.flush_paragraph();
                    self.builder = std::mem::take(&mut self.builder).rule();
                }
                BlockToken::Text(text) => {
                    if let Some(syntax) = UnsupportedSyntax::iter().find(|s| s.matches(&text)) {
                        self.issue(line, format!("{syntax} rendered as paragraph text"));
                    }
                    self.pending.push((line, text));
                }
            }
        }
        self.flush_paragraph();

        log::debug!(
            "parsed markdown: {} blocks, {} issues",
            self.builder.block_count(),
            self.issues.len()
        );
        (self.builder.build(), self.issues)
    }

    fn flush_paragraph(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.pending);
        let mut content = Vec::new();
        for (i, (line, text)) in lines.iter().enumerate() {
            if i > 0 {
                content.push(Inline::LineBreak);
            }
            content.extend(self.inline(text, *line));
        }
        self.builder = std::mem::take(&mut self.builder).paragraph(content);
    }

    fn inline(&mut self, text: &str, line: usize) -> Vec<Inline> {
        let mut unmatched = Vec::new();
        let content = parse_inline(text, &mut unmatched);
        for delim in unmatched {
            self.issue(line, format!("unmatched '{delim}' kept as text"));
        }
        content
    }

    fn issue(&mut self, line: usize, message: String) {
        let _ = warn_once("markdown", &format!("line {line}: {message}"));
        self.issues.push(ParseIssue { message, line });
    }
}

/// Parse inline Markdown (no block syntax) into builder content.
///
/// Source lines are trimmed and joined with hard line breaks, as in a
/// paragraph.
#[must_use]
pub fn parse_inline_text(text: &str) -> Vec<Inline> {
    let mut content = Vec::new();
    for (i, line) in text.lines().map(str::trim).enumerate() {
        if i > 0 {
            content.push(Inline::LineBreak);
        }
        let mut unmatched = Vec::new();
        content.extend(parse_inline(line, &mut unmatched));
    }
    content
}

/// Parse Markdown source into a document, discarding issues.
#[must_use]
pub fn parse(source: &str) -> Document {
    MarkdownParser::new(source).run()
}
