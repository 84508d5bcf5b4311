//! Glyph measurement and outlining with Skrifa.
//!
//! Text is mapped to glyphs one character at a time through the font's character map and
//! advanced by the horizontal advance of each glyph; there is no shaping. Outlines are
//! collected into a single Tiny-Skia path relative to the run's baseline origin so that the
//! caller can fill it, stroke it, or both with one transform.

use super::font_book::FontData;
use crate::card::FontSpec;
use crate::errors::RenderError;
use crate::render::backend::TextMetrics;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::raw::FontRef;
use skrifa::{GlyphId, MetadataProvider};
use tiny_skia::{Path, PathBuilder};

/// Outline of a whole run, with the baseline origin at `(0, 0)`.
pub struct OutlinedRun {
    /// `None` when the run has no visible glyphs (e.g. only spaces).
    pub path: Option<Path>,
    pub advance: f32,
}

fn unavailable(font: &FontSpec, reason: impl ToString) -> RenderError {
    RenderError::MeasurementUnavailable {
        font: font.name.clone(),
        reason: reason.to_string(),
    }
}

fn load<'a>(data: &'a FontData, font: &FontSpec) -> Result<FontRef<'a>, RenderError> {
    data.font_ref().map_err(|e| unavailable(font, e))
}

/// Measures `text` set in `font`. Ascent and descent are the font-box values.
pub fn measure(data: &FontData, font: &FontSpec, text: &str) -> Result<TextMetrics, RenderError> {
    let font_ref = load(data, font)?;
    let size = Size::new(font.size);
    let location = LocationRef::default();
    let charmap = font_ref.charmap();
    let glyph_metrics = font_ref.glyph_metrics(size, location);
    let metrics = font_ref.metrics(size, location);

    let width = text
        .chars()
        .map(|ch| {
            let gid = charmap.map(ch).unwrap_or_default();
            glyph_metrics.advance_width(gid).unwrap_or_default()
        })
        .sum();

    Ok(TextMetrics {
        width,
        ascent: metrics.ascent,
        descent: -metrics.descent,
    })
}

/// Builds the outline path for `text` set in `font`.
pub fn outline(data: &FontData, font: &FontSpec, text: &str) -> Result<OutlinedRun, RenderError> {
    let font_ref = load(data, font)?;
    let size = Size::new(font.size);
    let location = LocationRef::default();
    let charmap = font_ref.charmap();
    let glyph_metrics = font_ref.glyph_metrics(size, location);
    let outlines = font_ref.outline_glyphs();

    let mut pen = PathPen::new();
    for ch in text.chars() {
        let gid: GlyphId = charmap.map(ch).unwrap_or_default();
        if let Some(glyph) = outlines.get(gid) {
            glyph
                .draw(DrawSettings::unhinted(size, location), &mut pen)
                .map_err(|e| unavailable(font, e))?;
        }
        pen.origin_x += glyph_metrics.advance_width(gid).unwrap_or_default();
    }

    Ok(OutlinedRun {
        advance: pen.origin_x,
        path: pen.builder.finish(),
    })
}

/// Collects glyph outlines into a path, flipping the font's y-up space to y-down.
struct PathPen {
    builder: PathBuilder,
    origin_x: f32,
}

impl PathPen {
    fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x: 0.0,
        }
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.origin_x + x, -y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.origin_x + x, -y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.origin_x + cx0, -cy0, self.origin_x + x, -y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.origin_x + cx0,
            -cy0,
            self.origin_x + cx1,
            -cy1,
            self.origin_x + x,
            -y,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
