//! Themes: per-element style rules plus page settings.
//!
//! A theme is plain data. Presets are built in code; user themes are JSON
//! documents overlaid onto a preset, so a file only names what it changes:
//!
//! ```json
//! { "page": { "background": "#fdf6e3" }, "h1": { "color": "#268bd2" } }
//! ```

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::color::ColorValue;

/// Errors produced while loading a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The document is not valid JSON or does not match the theme shape.
    #[error("invalid theme document: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("invalid theme value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Sizes of the four edges of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// The same size on every edge.
    #[must_use]
    pub const fn uniform(size: f32) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    /// Left plus right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Canvas-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStyle {
    /// Fill color of the whole canvas.
    pub background: ColorValue,
    /// Inset of the content area from the canvas edges.
    pub padding: EdgeSizes,
}

/// Style declarations for one element kind. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleRule {
    /// Font family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Bold weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Italic slant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Text (or rule) color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    /// Background painted behind inline text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorValue>,
    /// Line-height multiplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    /// Space above a block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_before: Option<f32>,
    /// Space below a block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_after: Option<f32>,
    /// Stroke thickness of a horizontal rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_thickness: Option<f32>,
}

impl StyleRule {
    fn heading(size: f32, gray: u8, margin_before: f32, margin_after: f32) -> Self {
        Self {
            font_size: Some(size),
            bold: Some(true),
            color: Some(ColorValue::rgb(gray, gray, gray)),
            margin_before: Some(margin_before),
            margin_after: Some(margin_after),
            ..Self::default()
        }
    }

    fn check(&self, name: &str) -> Result<(), ThemeError> {
        let positive = [
            ("font_size", self.font_size),
            ("line_height", self.line_height),
        ];
        for (field, value) in positive {
            if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                return Err(invalid(name, field, "must be a positive number"));
            }
        }
        let non_negative = [
            ("margin_before", self.margin_before),
            ("margin_after", self.margin_after),
            ("rule_thickness", self.rule_thickness),
        ];
        for (field, value) in non_negative {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(invalid(name, field, "must be zero or positive"));
            }
        }
        if self.font_family.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(invalid(name, "font_family", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(rule: &str, field: &str, reason: &'static str) -> ThemeError {
    ThemeError::Invalid {
        field: format!("{rule}.{field}"),
        reason,
    }
}

/// A complete theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Canvas settings.
    pub page: PageStyle,
    /// Base declarations every block starts from.
    pub global: StyleRule,
    /// Level-1 heading.
    pub h1: StyleRule,
    /// Level-2 heading.
    pub h2: StyleRule,
    /// Level-3 heading.
    pub h3: StyleRule,
    /// Level-4 heading.
    pub h4: StyleRule,
    /// Level-5 heading.
    pub h5: StyleRule,
    /// Level-6 heading.
    pub h6: StyleRule,
    /// Paragraph.
    pub paragraph: StyleRule,
    /// Strong emphasis.
    pub bold: StyleRule,
    /// Emphasis.
    pub italic: StyleRule,
    /// Inline code.
    pub code: StyleRule,
    /// Horizontal rule.
    pub hr: StyleRule,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Black on white.
    #[must_use]
    pub fn light() -> Self {
        Self {
            page: PageStyle {
                background: ColorValue::WHITE,
                padding: EdgeSizes::uniform(20.0),
            },
            global: StyleRule {
                font_family: Some("sans-serif".to_string()),
                font_size: Some(14.0),
                bold: Some(false),
                italic: Some(false),
                color: Some(ColorValue::BLACK),
                line_height: Some(1.5),
                ..StyleRule::default()
            },
            h1: StyleRule::heading(32.0, 0x00, 18.0, 16.0),
            h2: StyleRule::heading(28.0, 0x22, 16.0, 14.0),
            h3: StyleRule::heading(24.0, 0x33, 14.0, 12.0),
            h4: StyleRule::heading(20.0, 0x44, 12.0, 10.0),
            h5: StyleRule::heading(18.0, 0x55, 10.0, 8.0),
            h6: StyleRule::heading(16.0, 0x66, 8.0, 6.0),
            paragraph: StyleRule {
                line_height: Some(1.6),
                margin_before: Some(8.0),
                margin_after: Some(10.0),
                ..StyleRule::default()
            },
            bold: StyleRule {
                bold: Some(true),
                ..StyleRule::default()
            },
            italic: StyleRule {
                italic: Some(true),
                ..StyleRule::default()
            },
            code: StyleRule {
                font_family: Some("monospace".to_string()),
                background: Some(ColorValue::rgb(0xf5, 0xf5, 0xf5)),
                ..StyleRule::default()
            },
            hr: StyleRule {
                color: Some(ColorValue::rgb(0xcc, 0xcc, 0xcc)),
                margin_before: Some(10.0),
                margin_after: Some(10.0),
                rule_thickness: Some(1.0),
                ..StyleRule::default()
            },
        }
    }

    /// White on near-black.
    #[must_use]
    pub fn dark() -> Self {
        let mut theme = Self::light();
        theme.page.background = ColorValue::rgb(0x12, 0x12, 0x12);
        theme.global.color = Some(ColorValue::WHITE);
        for (level, gray) in (1..=6).zip([0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa]) {
            theme.heading_mut(level).color = Some(ColorValue::rgb(gray, gray, gray));
        }
        theme.code.background = Some(ColorValue::rgb(0x2d, 0x2d, 0x2d));
        theme.hr.color = Some(ColorValue::rgb(0x44, 0x44, 0x44));
        theme
    }

    /// Larger type and looser lines, tuned for Chinese text.
    #[must_use]
    pub fn cjk_friendly() -> Self {
        let mut theme = Self::light();
        theme.global.font_size = Some(16.0);
        theme.global.line_height = Some(1.8);
        for (level, size) in (1..=6).zip([36.0, 30.0, 26.0, 22.0, 20.0, 18.0]) {
            theme.heading_mut(level).font_size = Some(size);
        }
        theme.paragraph.line_height = Some(1.8);
        theme
    }

    /// Rule for a heading level; out-of-range levels clamp to 1..=6.
    #[must_use]
    pub fn heading(&self, level: u8) -> &StyleRule {
        match level {
            0 | 1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            _ => &self.h6,
        }
    }

    /// Mutable rule for a heading level; out-of-range levels clamp to 1..=6.
    pub fn heading_mut(&mut self, level: u8) -> &mut StyleRule {
        match level {
            0 | 1 => &mut self.h1,
            2 => &mut self.h2,
            3 => &mut self.h3,
            4 => &mut self.h4,
            5 => &mut self.h5,
            _ => &mut self.h6,
        }
    }

    /// Set the base font family, and the base size if given.
    #[must_use]
    pub fn with_font(mut self, family: impl Into<String>, size: Option<f32>) -> Self {
        self.global.font_family = Some(family.into());
        if size.is_some() {
            self.global.font_size = size;
        }
        self
    }

    /// Set one family on all six heading levels.
    #[must_use]
    pub fn with_heading_font(mut self, family: &str) -> Self {
        for level in 1..=6 {
            self.heading_mut(level).font_family = Some(family.to_string());
        }
        self
    }

    /// Load a JSON theme overlaid onto [`Theme::light`].
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] when the JSON is malformed, names unknown
    /// fields, or carries out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Self::from_json_over(json, &Self::light())
    }

    /// Load a JSON theme overlaid onto `base`.
    ///
    /// Objects merge key by key; any other value replaces the base value.
    ///
    /// # Errors
    ///
    /// Same as [`Theme::from_json`].
    pub fn from_json_over(json: &str, base: &Self) -> Result<Self, ThemeError> {
        let overlay: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        merge(&mut merged, overlay);
        let theme: Self = serde_json::from_value(merged)?;
        theme.validate()?;
        Ok(theme)
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ThemeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every rule for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ThemeError> {
        let rules = [
            ("global", &self.global),
            ("h1", &self.h1),
            ("h2", &self.h2),
            ("h3", &self.h3),
            ("h4", &self.h4),
            ("h5", &self.h5),
            ("h6", &self.h6),
            ("paragraph", &self.paragraph),
            ("bold", &self.bold),
            ("italic", &self.italic),
            ("code", &self.code),
            ("hr", &self.hr),
        ];
        for (name, rule) in rules {
            rule.check(name)?;
        }
        let p = self.page.padding;
        if [p.top, p.right, p.bottom, p.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(invalid("page", "padding", "must be zero or positive"));
        }
        Ok(())
    }
}

fn merge(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        let _ = base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Built-in themes, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemePreset {
    /// [`Theme::light`]
    #[default]
    Light,
    /// [`Theme::dark`]
    Dark,
    /// [`Theme::cjk_friendly`]
    Cjk,
}

impl ThemePreset {
    /// Build the preset.
    #[must_use]
    pub fn theme(self) -> Theme {
        match self {
            Self::Light => Theme::light(),
            Self::Dark => Theme::dark(),
            Self::Cjk => Theme::cjk_friendly(),
        }
    }
}
