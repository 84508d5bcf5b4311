use crate::card::FontSpec;
use crate::errors::RenderError;
use crate::geometry::Dimensions;
use crate::render::Color;
use std::any::Any;

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Largest width or height a surface may have.
    pub const MAX_DIMENSION: u32 = 16384;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fails for empty sizes and for sizes beyond [`SurfaceSize::MAX_DIMENSION`].
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.width > 0 && self.height > 0,
            "surface size must be non-zero, got {}x{}",
            self.width,
            self.height
        );
        anyhow::ensure!(
            self.width <= Self::MAX_DIMENSION && self.height <= Self::MAX_DIMENSION,
            "surface {}x{} exceeds {}px",
            self.width,
            self.height,
            Self::MAX_DIMENSION
        );
        Ok(())
    }

    /// Bytes needed for an RGBA8 buffer of this size.
    pub fn rgba_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl From<Dimensions> for SurfaceSize {
    /// Pixel sizes truncate like a canvas width attribute does, but never reach zero.
    fn from(d: Dimensions) -> Self {
        Self {
            width: (d.width.floor() as u32).max(1),
            height: (d.height.floor() as u32).max(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGBA with color channels premultiplied by alpha.
    PreMulRgba8,
}

/// Decoded bitmap of an image resource.
#[derive(Clone, PartialEq)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
}

impl RgbaImage {
    /// Wraps a premultiplied RGBA8 buffer, returning `None` when it is too small for the
    /// given dimensions.
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        let stride = width.checked_mul(4)?;
        if pixels.len() < (height as usize) * (stride as usize) {
            return None;
        }

        Some(Self {
            pixels,
            width,
            height,
            stride,
            format: PixelFormat::PreMulRgba8,
        })
    }

    /// A single-color image, mostly useful in tests.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        let pm = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        let px = [pm(r), pm(g), pm(b), a];
        let len = (width as usize) * (height as usize) * 4;
        let pixels = px.iter().copied().cycle().take(len).collect();

        Self {
            pixels,
            width,
            height,
            stride: width * 4,
            format: PixelFormat::PreMulRgba8,
        }
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// Measured extent of a piece of text. `ascent` and `descent` are the font-box values and
/// are both positive distances from the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// A line of text positioned at its baseline origin.
///
/// When `max_width` is set and the text measures wider, it is condensed horizontally to
/// fit, matching the `maxWidth` argument of canvas `fillText`.
#[derive(Clone, Copy, Debug)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub font: &'a FontSpec,
    pub max_width: Option<f32>,
}

/// Raster surface a card is drawn onto.
///
/// Coordinates passed to drawing calls are in scene units and multiplied by the scale set
/// with [`Surface::set_scale`]. Calls occur on the renderer's owning thread.
pub trait Surface: Any + Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn size(&self) -> SurfaceSize;

    /// Reallocates the surface. Contents are undefined afterwards.
    fn resize(&mut self, size: SurfaceSize) -> anyhow::Result<()>;

    /// Uniform scale from scene units to pixels for subsequent drawing calls.
    fn set_scale(&mut self, scale: f32);

    /// Fills the whole surface, ignoring the scale.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Draws `image` stretched into the given rectangle.
    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, width: f32, height: f32);

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<TextMetrics, RenderError>;

    fn fill_text(&mut self, run: &TextRun<'_>, color: Color) -> Result<(), RenderError>;

    /// Outlines the glyphs of `run`. A `width` of zero or less draws nothing.
    fn stroke_text(&mut self, run: &TextRun<'_>, color: Color, width: f32) -> Result<(), RenderError>;

    /// Encodes the current contents as PNG.
    fn encode_png(&self) -> anyhow::Result<Vec<u8>>;
}

/// Creates surfaces. The renderer holds one backend for its lifetime.
pub trait RenderBackend: Send {
    fn name(&self) -> &str;

    fn create_surface(&self, size: SurfaceSize) -> anyhow::Result<Box<dyn Surface>>;
}
