use crate::errors::RenderError;
use serde::{Deserialize, Serialize};

/// RGBA color used for drawing commands.
///
/// Channels are represented as `f32` in the range `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel (opacity)
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from `f32` channel values in the range `0.0 ..= 1.0`.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parses a CSS color string (`#rgb`, `#rrggbb`, `rgb()`, named colors, ...).
    pub fn parse(s: &str) -> Result<Color, RenderError> {
        let parsed = csscolorparser::parse(s).map_err(|e| RenderError::InvalidColor(format!("{s}: {e}")))?;
        let [r, g, b, a] = parsed.to_rgba8();
        Ok(Color::from_u8(r, g, b, a))
    }

    /// Returns the channels as `u8` values (0–255).
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}
