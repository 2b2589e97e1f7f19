//! Inline tokenizer: code spans, strong emphasis and emphasis.
//!
//! Precedence follows the usual reading of Markdown: a code span is literal
//! and wins over everything, `**`/`__` is tried before `*`/`_`, and emphasis
//! content is tokenized recursively so the two nest. A delimiter without a
//! matching closer is kept as literal text.

use mdraster_dom::Inline;

/// Tokenize one line of inline Markdown.
///
/// Every delimiter left unmatched is reported in `unmatched` (one entry per
/// occurrence) and kept as literal text.
#[must_use]
pub fn parse_inline(line: &str, unmatched: &mut Vec<char>) -> Vec<Inline> {
    let chars: Vec<char> = line.chars().collect();
    InlineScanner {
        chars: &chars,
        unmatched,
    }
    .scan(0, chars.len())
}

struct InlineScanner<'a> {
    chars: &'a [char],
    unmatched: &'a mut Vec<char>,
}

impl InlineScanner<'_> {
    fn scan(&mut self, start: usize, end: usize) -> Vec<Inline> {
        let mut out = Vec::new();
        let mut literal = String::new();
        let mut i = start;

        while i < end {
            let c = self.chars[i];
            match c {
                '`' => {
                    if let Some(close) = self.find(i + 1, end, |s, j| s.chars[j] == '`') {
                        flush(&mut literal, &mut out);
                        out.push(Inline::Code(self.chars[i + 1..close].iter().collect()));
                        i = close + 1;
                        continue;
                    }
                }
                '*' | '_' if self.can_open(i, end) => {
                    let double = i + 1 < end && self.chars[i + 1] == c;
                    if double {
                        if let Some(close) = self.find_double_closer(c, i + 2, end) {
                            flush(&mut literal, &mut out);
                            out.push(Inline::Bold(self.scan(i + 2, close)));
                            i = close + 2;
                            continue;
                        }
                    }
                    if let Some(close) = self.find_single_closer(c, i + 1, end) {
                        flush(&mut literal, &mut out);
                        out.push(Inline::Italic(self.scan(i + 1, close)));
                        i = close + 1;
                        continue;
                    }
                }
                _ => {
                    literal.push(c);
                    i += 1;
                    continue;
                }
            }

            // Unmatched delimiter: literal.
            self.unmatched.push(c);
            literal.push(c);
            i += 1;
        }

        flush(&mut literal, &mut out);
        out
    }

    /// First index in `from..end` satisfying `pred`, with non-empty content.
    fn find(&self, from: usize, end: usize, pred: impl Fn(&Self, usize) -> bool) -> Option<usize> {
        (from..end).find(|&j| pred(self, j)).filter(|&j| j > from)
    }

    fn find_double_closer(&self, delim: char, from: usize, end: usize) -> Option<usize> {
        self.find(from, end, |s, j| {
            j + 1 < end && s.chars[j] == delim && s.chars[j + 1] == delim && s.can_close(j, 2, end)
        })
    }

    fn find_single_closer(&self, delim: char, from: usize, end: usize) -> Option<usize> {
        let mut j = from;
        while j < end {
            if self.chars[j] == '`' {
                // Skip code spans; their content is literal.
                if let Some(close) = (j + 1..end).find(|&k| self.chars[k] == '`') {
                    j = close + 1;
                    continue;
                }
            }
            if self.chars[j] == delim {
                if j + 1 < end && self.chars[j + 1] == delim {
                    // A nested strong delimiter, not our closer.
                    j += 2;
                    continue;
                }
                if j > from && self.can_close(j, 1, end) {
                    return Some(j);
                }
            }
            j += 1;
        }
        None
    }

    /// `_` never opens inside a word (`snake_case`); `*` always may.
    fn can_open(&self, i: usize, end: usize) -> bool {
        if i + 1 >= end || self.chars[i + 1].is_whitespace() {
            return false;
        }
        self.chars[i] != '_' || i == 0 || !self.chars[i - 1].is_alphanumeric()
    }

    /// A closer of `len` delimiters at `i` must follow non-whitespace; `_`
    /// must also not be followed by a word character.
    fn can_close(&self, i: usize, len: usize, end: usize) -> bool {
        if i == 0 || self.chars[i - 1].is_whitespace() {
            return false;
        }
        let after = i + len;
        self.chars[i] != '_' || after >= end || !self.chars[after].is_alphanumeric()
    }
}

fn flush(literal: &mut String, out: &mut Vec<Inline>) {
    if !literal.is_empty() {
        out.push(Inline::Text(std::mem::take(literal)));
    }
}
