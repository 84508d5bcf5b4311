//! What the draw pipeline consumes: a flat list of images and text blocks in native card
//! coordinates, in draw order.

use crate::geometry::BoundingConstraint;
use serde::{Deserialize, Serialize};

/// Font family name and size in layout units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self { name: name.into(), size }
    }
}

/// Outline drawn around text glyphs. A width of zero is allowed and draws nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeSpec {
    pub color: String,
    pub width: f32,
}

/// A single block of uniformly styled text.
///
/// `(x, y)` is the left end of the baseline. For wrapped blocks it is the baseline of the
/// *last* line; earlier lines stack upwards from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlockSpec {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    pub font: FontSpec,
    pub fill_color: String,
    #[serde(default)]
    pub stroke: Option<StrokeSpec>,
    #[serde(default)]
    pub wrap: bool,
}

impl TextBlockSpec {
    /// A black, unstroked, non-wrapping block.
    pub fn new(text: impl Into<String>, x: f32, y: f32, max_width: f32, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            max_width,
            font,
            fill_color: "black".to_string(),
            stroke: None,
            wrap: false,
        }
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill_color = color.into();
        self
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f32) -> Self {
        self.stroke = Some(StrokeSpec {
            color: color.into(),
            width,
        });
        self
    }

    pub fn wrapped(mut self) -> Self {
        self.wrap = true;
        self
    }
}

/// An image placed with its top-left corner at `(x, y)`.
///
/// Missing bounds fall back to the image's natural size on that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Opaque locator handed to the image loader; also the cache key
    pub key: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub max_width: Option<f32>,
    #[serde(default)]
    pub max_height: Option<f32>,
}

impl ImageRef {
    /// An image drawn at its natural size.
    pub fn new(key: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            key: key.into(),
            x,
            y,
            max_width: None,
            max_height: None,
        }
    }

    /// An image scaled to fit `bounds`.
    pub fn bounded(key: impl Into<String>, x: f32, y: f32, bounds: BoundingConstraint) -> Self {
        Self {
            key: key.into(),
            x,
            y,
            max_width: Some(bounds.max_width),
            max_height: Some(bounds.max_height),
        }
    }
}

/// Everything drawn for one card, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardScene {
    pub images: Vec<ImageRef>,
    pub texts: Vec<TextBlockSpec>,
}

impl CardScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_image(&mut self, image: ImageRef) {
        self.images.push(image);
    }

    pub fn push_text(&mut self, text: TextBlockSpec) {
        self.texts.push(text);
    }
}
