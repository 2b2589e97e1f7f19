//! Display list: drawing commands in painting order.

use mdraster_font::FontHandle;
use mdraster_style::ColorValue;

/// A single drawing command.
///
/// Commands are added in painting order (back to front).
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color (inline-code backgrounds).
    FillRect {
        /// X coordinate of the top-left corner.
        x: f32,
        /// Y coordinate of the top-left corner.
        y: f32,
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
        /// Fill color.
        color: ColorValue,
    },

    /// Draw a string starting at a baseline origin.
    DrawText {
        /// X coordinate of the pen start.
        x: f32,
        /// Y coordinate of the baseline.
        y: f32,
        /// Text to draw.
        text: String,
        /// Font to rasterize with.
        font: FontHandle,
        /// Text color.
        color: ColorValue,
    },

    /// Draw a horizontal line centred on `y`.
    DrawLine {
        /// Left end.
        x1: f32,
        /// Right end.
        x2: f32,
        /// Vertical centre of the stroke.
        y: f32,
        /// Stroke thickness.
        thickness: f32,
        /// Stroke color.
        color: ColorValue,
    },
}

/// A list of drawing commands in painting order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
