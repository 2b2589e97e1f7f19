//! Script classification.
//!
//! CJK text wraps between any two characters; everything else wraps only at
//! whitespace. The classification is a per-character code point range test.

/// How a character participates in line breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    /// Ideographs, kana, hangul and full-width forms.
    Cjk,
    /// Whitespace (including the ideographic space).
    Space,
    /// Latin and everything else.
    Other,
}

impl ScriptClass {
    /// Classify one character. Whitespace wins over CJK.
    #[must_use]
    pub fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            Self::Space
        } else if is_cjk(ch) {
            Self::Cjk
        } else {
            Self::Other
        }
    }
}

/// Code point ranges treated as CJK.
const CJK_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x11FF),   // Hangul Jamo
    (0x3000, 0x303F),   // CJK Symbols and Punctuation
    (0x3040, 0x30FF),   // Hiragana, Katakana
    (0x3100, 0x312F),   // Bopomofo
    (0x3400, 0x4DBF),   // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF),   // CJK Unified Ideographs
    (0xAC00, 0xD7AF),   // Hangul Syllables
    (0xF900, 0xFAFF),   // CJK Compatibility Ideographs
    (0xFF00, 0xFFEF),   // Halfwidth and Fullwidth Forms
    (0x20000, 0x2FA1F), // Supplementary Ideographic Plane
];

/// Whether `ch` is a CJK character.
#[must_use]
pub fn is_cjk(ch: char) -> bool {
    let cp = u32::from(ch);
    CJK_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}
