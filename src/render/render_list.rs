//! Render list and display items.
//!
//! A [`RenderList`] is the sequence of drawing commands a surface received during one
//! render pass. The recording backend keeps one per surface so that hosts and tests can
//! inspect exactly what was drawn, in order, without rasterizing anything.
//!
//! # Example
//!
//! ```rust
//! use card_renderer::render::{Color, DisplayItem, RenderList};
//!
//! let mut list = RenderList::new();
//!
//! // Clear background
//! list.add_command(DisplayItem::Clear { color: Color::from_u8(0xcd, 0xcd, 0xcd, 255) });
//!
//! // Draw a white rectangle
//! list.add_command(DisplayItem::Rect {
//!     x: 10.0,
//!     y: 20.0,
//!     w: 100.0,
//!     h: 50.0,
//!     color: Color::WHITE,
//! });
//! assert_eq!(list.items.len(), 2);
//! ```

use crate::render::Color;
use serde::Serialize;

/// A single display item representing a drawing command.
///
/// Positions and sizes are in pixels, i.e. after the surface scale was applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DisplayItem {
    /// Clear the entire surface with the given color.
    Clear {
        /// The color to clear the surface with.
        color: Color,
    },

    /// Draw a filled rectangle at `(x, y)` with width `w` and height `h`.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },

    /// Draw an image of `src_width` x `src_height` pixels stretched into the rectangle.
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        src_width: u32,
        src_height: u32,
    },

    /// Fill the glyphs of a text run whose baseline starts at `(x, y)`.
    FillText {
        text: String,
        x: f32,
        y: f32,
        /// Font family name.
        font: String,
        /// Font size in pixels.
        size: f32,
        color: Color,
        max_width: Option<f32>,
    },

    /// Stroke the glyph outlines of a text run whose baseline starts at `(x, y)`.
    StrokeText {
        text: String,
        x: f32,
        y: f32,
        font: String,
        size: f32,
        color: Color,
        /// Stroke width in pixels.
        width: f32,
        max_width: Option<f32>,
    },
}

/// A list of display items, in the order they were drawn.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderList {
    /// Sequence of drawing commands.
    pub items: Vec<DisplayItem>,
}

impl RenderList {
    /// Creates a new, empty render list.
    pub fn new() -> Self {
        RenderList { items: Vec::new() }
    }

    /// Adds a new display item (drawing command) to the list.
    pub fn add_command(&mut self, command: DisplayItem) {
        self.items.push(command);
    }

    /// Clears all display items from the list.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Texts of all fill commands, in draw order.
    pub fn filled_texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                DisplayItem::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of image blits.
    pub fn image_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DisplayItem::Image { .. }))
            .count()
    }
}
