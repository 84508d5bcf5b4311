use crate::card::FontSpec;
use crate::errors::RenderError;
use crate::render::backend::{RenderBackend, RgbaImage, Surface, SurfaceSize, TextMetrics, TextRun};
use crate::render::encode::encode_rgba_png;
use crate::render::{Color, DisplayItem, RenderList};
use anyhow::Result;
use std::any::Any;

/// Font metrics synthesized from the font size, so text can be laid out without any font
/// files: every character advances `advance * size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticMetrics {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for SyntheticMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

/// Backend whose surfaces record display items instead of rasterizing.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    metrics: SyntheticMetrics,
    unavailable_fonts: Vec<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: SyntheticMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Makes measuring text in `font` fail, as if the font could not be loaded.
    pub fn with_unavailable_font(mut self, font: impl Into<String>) -> Self {
        self.unavailable_fonts.push(font.into());
        self
    }
}

impl RenderBackend for RecordingBackend {
    fn name(&self) -> &str {
        "RecordingBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn Surface>> {
        Ok(Box::new(RecordingSurface::new(
            size,
            self.metrics,
            self.unavailable_fonts.clone(),
        )?))
    }
}

pub struct RecordingSurface {
    /// Size of the surface in pixels.
    size: SurfaceSize,
    scale: f32,
    metrics: SyntheticMetrics,
    unavailable_fonts: Vec<String>,
    /// Items drawn since the last clear.
    list: RenderList,
}

impl RecordingSurface {
    pub fn new(size: SurfaceSize, metrics: SyntheticMetrics, unavailable_fonts: Vec<String>) -> Result<Self> {
        size.validate()?;

        Ok(Self {
            size,
            scale: 1.0,
            metrics,
            unavailable_fonts,
            list: RenderList::new(),
        })
    }

    /// Everything drawn since the surface was last cleared.
    pub fn render_list(&self) -> &RenderList {
        &self.list
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn check_font(&self, font: &FontSpec) -> Result<(), RenderError> {
        if self.unavailable_fonts.iter().any(|f| f == &font.name) {
            return Err(RenderError::MeasurementUnavailable {
                font: font.name.clone(),
                reason: "font is not available".to_string(),
            });
        }
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        size.validate()?;
        self.size = size;
        self.list.clear();
        Ok(())
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn clear(&mut self, color: Color) {
        self.list.clear();
        self.list.add_command(DisplayItem::Clear { color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let s = self.scale;
        self.list.add_command(DisplayItem::Rect {
            x: x * s,
            y: y * s,
            w: width * s,
            h: height * s,
            color,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, width: f32, height: f32) {
        let s = self.scale;
        self.list.add_command(DisplayItem::Image {
            x: x * s,
            y: y * s,
            w: width * s,
            h: height * s,
            src_width: image.width,
            src_height: image.height,
        });
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<TextMetrics, RenderError> {
        self.check_font(font)?;
        Ok(TextMetrics {
            width: text.chars().count() as f32 * self.metrics.advance * font.size,
            ascent: self.metrics.ascent * font.size,
            descent: self.metrics.descent * font.size,
        })
    }

    fn fill_text(&mut self, run: &TextRun<'_>, color: Color) -> Result<(), RenderError> {
        self.check_font(run.font)?;
        let s = self.scale;
        self.list.add_command(DisplayItem::FillText {
            text: run.text.to_string(),
            x: run.x * s,
            y: run.y * s,
            font: run.font.name.clone(),
            size: run.font.size * s,
            color,
            max_width: run.max_width.map(|w| w * s),
        });
        Ok(())
    }

    fn stroke_text(&mut self, run: &TextRun<'_>, color: Color, width: f32) -> Result<(), RenderError> {
        self.check_font(run.font)?;
        if width <= 0.0 {
            return Ok(());
        }
        let s = self.scale;
        self.list.add_command(DisplayItem::StrokeText {
            text: run.text.to_string(),
            x: run.x * s,
            y: run.y * s,
            font: run.font.name.clone(),
            size: run.font.size * s,
            color,
            width: width * s,
            max_width: run.max_width.map(|w| w * s),
        });
        Ok(())
    }

    /// Nothing is rasterized, so the encoded image is fully transparent.
    fn encode_png(&self) -> Result<Vec<u8>> {
        let pixels = vec![0u8; self.size.rgba_len()];
        encode_rgba_png(self.size.width, self.size.height, &pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_scaled_commands() {
        let backend = RecordingBackend::new();
        let mut surface = backend.create_surface(SurfaceSize::new(100, 100)).unwrap();
        surface.set_scale(0.5);
        surface.clear(Color::WHITE);
        surface.fill_rect(10.0, 10.0, 20.0, 40.0, Color::BLACK);

        let rec = surface.as_any().downcast_ref::<RecordingSurface>().unwrap();
        assert_eq!(
            rec.render_list().items,
            vec![
                DisplayItem::Clear { color: Color::WHITE },
                DisplayItem::Rect { x: 5.0, y: 5.0, w: 10.0, h: 20.0, color: Color::BLACK },
            ]
        );
    }

    #[test]
    fn zero_width_stroke_draws_nothing() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(10, 10), SyntheticMetrics::default(), vec![]).unwrap();
        let font = FontSpec::new("Any", 10.0);
        let run = TextRun { text: "hi", x: 0.0, y: 0.0, font: &font, max_width: None };
        surface.stroke_text(&run, Color::WHITE, 0.0).unwrap();
        assert!(surface.render_list().items.is_empty());
    }

    #[test]
    fn unavailable_font_fails_measurement() {
        let backend = RecordingBackend::new().with_unavailable_font("Missing");
        let mut surface = backend.create_surface(SurfaceSize::new(10, 10)).unwrap();
        let err = surface.measure_text("x", &FontSpec::new("Missing", 12.0)).unwrap_err();
        assert!(matches!(err, RenderError::MeasurementUnavailable { .. }));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(RecordingBackend::new().create_surface(SurfaceSize::new(0, 10)).is_err());
    }

    #[test]
    fn oversized_surface_is_rejected() {
        let backend = RecordingBackend::new();
        assert!(backend.create_surface(SurfaceSize::new(u32::MAX, u32::MAX)).is_err());

        let mut surface = backend.create_surface(SurfaceSize::new(10, 10)).unwrap();
        assert!(surface.resize(SurfaceSize::new(SurfaceSize::MAX_DIMENSION + 1, 10)).is_err());
        assert_eq!(surface.size(), SurfaceSize::new(10, 10));
    }
}
