//! CPU raster backend built on Tiny-Skia.
//!
//! Text is outlined with Skrifa from fonts held in a shared [`FontBook`]; fonts are
//! registered on the backend and every surface it creates sees them.

mod font_book;
mod font_manager;
mod text_renderer;

pub use font_book::{FontBook, FontData};
pub use font_manager::FontManager;

use crate::card::FontSpec;
use crate::config::RendererConfig;
use crate::errors::RenderError;
use crate::render::backend::{RenderBackend, RgbaImage, Surface, SurfaceSize, TextMetrics, TextRun};
use crate::render::encode::{demultiply, encode_rgba_png};
use crate::render::Color;
use anyhow::{anyhow, Result};
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};
use tiny_skia::{FillRule, FilterQuality, Paint, Path, Pixmap, PixmapPaint, PixmapRef, Rect, Stroke, Transform};

/// Tiny-Skia render backend.
pub struct PixmapBackend {
    fonts: Arc<Mutex<FontBook>>,
}

impl PixmapBackend {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            fonts: Arc::new(Mutex::new(FontBook::new(
                config.use_system_fonts,
                config.fallback_family.clone(),
            ))),
        }
    }

    /// Makes the font file `data` available under the family name `name`.
    pub fn register_font(&self, name: &str, data: Vec<u8>) -> Result<(), RenderError> {
        lock_fonts(&self.fonts)?.register(name, data, 0)
    }
}

impl RenderBackend for PixmapBackend {
    fn name(&self) -> &str {
        "PixmapBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn Surface>> {
        Ok(Box::new(PixmapSurface::new(size, self.fonts.clone())?))
    }
}

fn lock_fonts(fonts: &Mutex<FontBook>) -> Result<MutexGuard<'_, FontBook>, RenderError> {
    fonts
        .lock()
        .map_err(|_| RenderError::Surface("font book lock poisoned".to_string()))
}

fn new_pixmap(size: SurfaceSize) -> Result<Pixmap> {
    size.validate()?;
    Pixmap::new(size.width, size.height).ok_or_else(|| anyhow!("cannot allocate {}x{} pixmap", size.width, size.height))
}

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

pub struct PixmapSurface {
    pixmap: Pixmap,
    size: SurfaceSize,
    scale: f32,
    fonts: Arc<Mutex<FontBook>>,
}

impl PixmapSurface {
    fn new(size: SurfaceSize, fonts: Arc<Mutex<FontBook>>) -> Result<Self> {
        Ok(Self {
            pixmap: new_pixmap(size)?,
            size,
            scale: 1.0,
            fonts,
        })
    }

    /// Straight-alpha RGBA8 value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn font(&self, font: &FontSpec) -> Result<FontData, RenderError> {
        lock_fonts(&self.fonts)?.fetch(&font.name)
    }

    /// Outline of `run` and the transform placing it on the surface, including the
    /// horizontal condensing required by `max_width`.
    fn text_path(&self, run: &TextRun<'_>) -> Result<Option<(Path, Transform)>, RenderError> {
        let data = self.font(run.font)?;
        let outlined = text_renderer::outline(&data, run.font, run.text)?;
        let Some(path) = outlined.path else {
            return Ok(None);
        };

        // Condense the outline itself so a stroke keeps an even pen width.
        let path = match run.max_width {
            Some(max) if outlined.advance > max && outlined.advance > 0.0 => {
                let condense = max.max(0.0) / outlined.advance;
                match path.transform(Transform::from_scale(condense, 1.0)) {
                    Some(path) => path,
                    None => return Ok(None),
                }
            }
            _ => path,
        };
        let s = self.scale;
        let transform = Transform::from_row(s, 0.0, 0.0, s, s * run.x, s * run.y);
        Ok(Some((path, transform)))
    }
}

impl Surface for PixmapSurface {
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
        self.pixmap = new_pixmap(size)?;
        self.size = size;
        Ok(())
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let s = self.scale;
        self.pixmap
            .fill_rect(rect, &paint_for(color), Transform::from_scale(s, s), None);
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, width: f32, height: f32) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let Some(src) = PixmapRef::from_bytes(&image.pixels, image.width, image.height) else {
            log::warn!("image buffer does not match {}x{}", image.width, image.height);
            return;
        };

        let s = self.scale;
        let transform = Transform::from_row(
            s * width / image.width as f32,
            0.0,
            0.0,
            s * height / image.height as f32,
            s * x,
            s * y,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(0, 0, src, &paint, transform, None);
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<TextMetrics, RenderError> {
        let data = self.font(font)?;
        text_renderer::measure(&data, font, text)
    }

    fn fill_text(&mut self, run: &TextRun<'_>, color: Color) -> Result<(), RenderError> {
        if let Some((path, transform)) = self.text_path(run)? {
            self.pixmap
                .fill_path(&path, &paint_for(color), FillRule::Winding, transform, None);
        }
        Ok(())
    }

    fn stroke_text(&mut self, run: &TextRun<'_>, color: Color, width: f32) -> Result<(), RenderError> {
        // Zero width would be a hairline in Tiny-Skia; a canvas draws nothing.
        if width <= 0.0 {
            return Ok(());
        }
        if let Some((path, transform)) = self.text_path(run)? {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint_for(color), &stroke, transform, None);
        }
        Ok(())
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        encode_rgba_png(self.size.width, self.size.height, &demultiply(self.pixmap.data()))
    }
}
