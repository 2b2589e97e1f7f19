//! Style resolution for mdraster documents.
//!
//! A [`Theme`] holds one optional-valued [`StyleRule`] per element kind.
//! [`resolve_styles`] turns a document plus a theme into a [`StyleMap`] with a
//! fully populated [`StyleAttributes`] for every node, which is what layout
//! consumes. Layout itself never resolves or inherits anything.

pub mod cascade;
pub mod color;
pub mod theme;

pub use cascade::{StyleAttributes, StyleMap, resolve_styles};
pub use color::ColorValue;
pub use theme::{EdgeSizes, PageStyle, StyleRule, Theme, ThemeError, ThemePreset};
