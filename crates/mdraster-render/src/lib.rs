//! Rendering for mdraster.
//!
//! This crate executes a layout's display list onto a raster [`Canvas`] and
//! provides the end-to-end entry points:
//!
//! - [`render_document`]: styled document to pixels
//! - [`render_markdown`]: Markdown source and a theme to pixels
//! - [`MarkdownImage`]: fluent construction of a document, then rendering
//!
//! ```
//! use mdraster_font::{FontCache, FontLibrary};
//! use mdraster_render::render_markdown;
//! use mdraster_style::Theme;
//!
//! let fonts = FontCache::new(FontLibrary::approximate());
//! let rendered = render_markdown("# Hi\n\nsome *text*", &Theme::light(), 320, &fonts)?;
//! assert_eq!(rendered.canvas.width(), 320);
//! # Ok::<(), mdraster_render::RenderError>(())
//! ```

pub mod canvas;
pub mod renderer;

use mdraster_dom::{Document, DocumentBuilder};
use mdraster_font::{FontCache, FontLibrary};
use mdraster_layout::{
    DisplayList, LayoutError, LayoutOptions, LayoutTree, MarginMode, Painter, layout_document,
};
use mdraster_markdown::{parse, parse_inline_text};
use mdraster_style::{ColorValue, StyleMap, Theme, resolve_styles};
use thiserror::Error;

pub use canvas::Canvas;
pub use renderer::Renderer;

/// Errors that stop a render. No canvas is produced.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Layout failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The pixel buffer could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Page geometry and canvas background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Width, padding and margin mode handed to layout.
    pub layout: LayoutOptions,
    /// Color the canvas is cleared to.
    pub background: ColorValue,
}

impl RenderOptions {
    /// `width` pixels wide, no padding, white background.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            layout: LayoutOptions::new(width),
            background: ColorValue::WHITE,
        }
    }

    /// Padding and background from the theme's page style.
    #[must_use]
    pub fn from_theme(theme: &Theme, width: u32) -> Self {
        Self {
            layout: LayoutOptions::new(width).with_padding(theme.page.padding),
            background: theme.page.background,
        }
    }

    /// Set the margin mode.
    #[must_use]
    pub const fn with_margins(mut self, margins: MarginMode) -> Self {
        self.layout = self.layout.with_margins(margins);
        self
    }
}

/// Everything a render produced.
#[derive(Debug)]
pub struct Rendered {
    /// The positioned boxes.
    pub layout: LayoutTree,
    /// Drawing commands in paint order.
    pub display_list: DisplayList,
    /// The pixels.
    pub canvas: Canvas,
}

/// Lay out, paint and rasterize `doc`.
///
/// # Errors
///
/// Returns [`RenderError`] when layout fails or the canvas cannot be
/// allocated.
pub fn render_document(
    doc: &Document,
    styles: &StyleMap,
    options: &RenderOptions,
    fonts: &FontCache,
) -> Result<Rendered, RenderError> {
    let layout = layout_document(doc, styles, &options.layout, fonts)?;
    let display_list = Painter::new().paint(&layout);

    let mut renderer = Renderer::new(layout.width, layout.height, options.background)?;
    renderer.render(&display_list);
    log::debug!(
        "rendered {}x{} canvas from {} commands",
        layout.width,
        layout.height,
        display_list.len()
    );

    Ok(Rendered {
        layout,
        display_list,
        canvas: renderer.into_canvas(),
    })
}

/// Parse `source`, style it with `theme` and render it `width` pixels wide.
///
/// # Errors
///
/// Returns [`RenderError`] when layout fails or the canvas cannot be
/// allocated.
pub fn render_markdown(
    source: &str,
    theme: &Theme,
    width: u32,
    fonts: &FontCache,
) -> Result<Rendered, RenderError> {
    let doc = parse(source);
    let styles = resolve_styles(&doc, theme);
    render_document(&doc, &styles, &RenderOptions::from_theme(theme, width), fonts)
}

/// Fluent document construction followed by rendering.
///
/// Text passed to [`heading`](Self::heading) and
/// [`paragraph`](Self::paragraph) is parsed as inline Markdown, so
/// `**bold**` and `` `code` `` work there too.
///
/// ```
/// use mdraster_font::{FontCache, FontLibrary};
/// use mdraster_render::MarkdownImage;
///
/// let canvas = MarkdownImage::new()
///     .fonts(FontCache::new(FontLibrary::approximate()))
///     .heading(1, "Title")
///     .paragraph("first line\nsecond **line**")
///     .rule()
///     .render(400)?;
/// assert_eq!(canvas.width(), 400);
/// # Ok::<(), mdraster_render::RenderError>(())
/// ```
#[derive(Debug)]
pub struct MarkdownImage {
    builder: DocumentBuilder,
    theme: Theme,
    fonts: FontCache,
}

impl Default for MarkdownImage {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownImage {
    /// Empty document, light theme, system fonts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: DocumentBuilder::new(),
            theme: Theme::default(),
            fonts: FontCache::new(FontLibrary::system()),
        }
    }

    /// Use `theme` for styling and page geometry.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Use `fonts` for measuring and drawing.
    #[must_use]
    pub fn fonts(mut self, fonts: FontCache) -> Self {
        self.fonts = fonts;
        self
    }

    /// Append a heading; the level is clamped to 1..=6.
    #[must_use]
    pub fn heading(mut self, level: u8, text: &str) -> Self {
        self.builder = self.builder.heading(level, parse_inline_text(text));
        self
    }

    /// Append a paragraph. Each line of `text` becomes a line of output.
    #[must_use]
    pub fn paragraph(mut self, text: &str) -> Self {
        self.builder = self.builder.paragraph(parse_inline_text(text));
        self
    }

    /// Append a horizontal rule.
    #[must_use]
    pub fn rule(mut self) -> Self {
        self.builder = self.builder.rule();
        self
    }

    /// Append every block of a Markdown document.
    #[must_use]
    pub fn markdown(mut self, source: &str) -> Self {
        self.builder = self.builder.append_document(&parse(source));
        self
    }

    /// Render everything appended so far at `width` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when layout fails or the canvas cannot be
    /// allocated.
    pub fn render(self, width: u32) -> Result<Canvas, RenderError> {
        let doc = self.builder.build();
        let styles = resolve_styles(&doc, &self.theme);
        let options = RenderOptions::from_theme(&self.theme, width);
        Ok(render_document(&doc, &styles, &options, &self.fonts)?.canvas)
    }
}
