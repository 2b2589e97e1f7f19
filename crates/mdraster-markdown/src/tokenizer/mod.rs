//! Line-oriented block tokenizer.
//!
//! Each source line becomes exactly one [`BlockToken`]. Grouping lines into
//! paragraphs is the parser's job.

mod inline;

pub use inline::parse_inline;

use strum_macros::{Display, EnumIter};

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken {
    /// `#` to `######` followed by whitespace or end of line.
    Heading {
        /// Number of leading `#` characters.
        level: u8,
        /// Heading text with the optional closing sequence removed.
        text: String,
    },
    /// Three or more of the same `-`, `*` or `_`, optionally spaced.
    ThematicBreak,
    /// Any other non-blank line, trimmed.
    Text(String),
    /// A line holding only whitespace.
    Blank,
}

impl BlockToken {
    /// Whether this line starts a block of its own (and so ends a paragraph).
    #[must_use]
    pub const fn starts_block(&self) -> bool {
        matches!(self, Self::Heading { .. } | Self::ThematicBreak)
    }
}

/// Markdown constructs outside the supported subset.
///
/// Lines that look like one of these are rendered as plain paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum UnsupportedSyntax {
    /// `- item`, `+ item`, `* item`, `1. item`
    #[strum(to_string = "list item")]
    ListItem,
    /// `> quote`
    #[strum(to_string = "block quote")]
    BlockQuote,
    /// ```` ``` ```` or `~~~`
    #[strum(to_string = "fenced code block")]
    FencedCode,
    /// `| a | b |`
    #[strum(to_string = "table row")]
    TableRow,
}

impl UnsupportedSyntax {
    /// Whether a trimmed line opens this construct.
    #[must_use]
    pub fn matches(self, line: &str) -> bool {
        match self {
            Self::ListItem => {
                let bullet = ["- ", "+ ", "* "].iter().any(|p| line.starts_with(p));
                let digits = line.chars().take_while(char::is_ascii_digit).count();
                bullet
                    || (digits > 0
                        && (line[digits..].starts_with(". ") || line[digits..].starts_with(") ")))
            }
            Self::BlockQuote => line.starts_with('>'),
            Self::FencedCode => line.starts_with("```") || line.starts_with("~~~"),
            Self::TableRow => line.starts_with('|') && line.len() > 1 && line.ends_with('|'),
        }
    }
}

/// Splits Markdown source into one [`BlockToken`] per line.
pub struct BlockTokenizer<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> BlockTokenizer<'a> {
    /// Create a tokenizer over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
        }
    }

    /// Classify one line.
    #[must_use]
    pub fn classify(line: &str) -> BlockToken {
        let line = line.trim();
        if line.is_empty() {
            return BlockToken::Blank;
        }
        if let Some(heading) = Self::heading(line) {
            return heading;
        }
        if Self::is_thematic_break(line) {
            return BlockToken::ThematicBreak;
        }
        BlockToken::Text(line.to_string())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn heading(line: &str) -> Option<BlockToken> {
        let level = line.chars().take_while(|&c| c == '#').count();
        if !(1..=6).contains(&level) {
            return None;
        }
        let rest = &line[level..];
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }

        // Optional closing sequence: whitespace followed by `#`s only.
        let mut text = rest.trim();
        let without_hashes = text.trim_end_matches('#');
        if without_hashes.is_empty() {
            text = "";
        } else if without_hashes.len() < text.len() && without_hashes.ends_with(char::is_whitespace)
        {
            text = without_hashes.trim_end();
        }

        Some(BlockToken::Heading {
            level: level as u8,
            text: text.to_string(),
        })
    }

    fn is_thematic_break(line: &str) -> bool {
        let mut marks = line.chars().filter(|c| !c.is_whitespace());
        let Some(first) = marks.next() else {
            return false;
        };
        if !matches!(first, '-' | '*' | '_') {
            return false;
        }
        let mut count = 1;
        for c in marks {
            if c != first {
                return false;
            }
            count += 1;
        }
        count >= 3
    }
}

impl Iterator for BlockTokenizer<'_> {
    type Item = BlockToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(Self::classify)
    }
}
