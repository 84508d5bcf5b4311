//! One render pass over a [`CardScene`].
//!
//! The pass clears the surface, draws every image and then every text block, each in
//! scene order. Failures of a single element are recorded in the [`RenderReport`] and the
//! pass moves on to the next element; nothing here aborts the whole card.

use crate::assets::{ImageCache, ImageState};
use crate::card::{CardScene, ImageRef, TextBlockSpec};
use crate::config::RendererConfig;
use crate::errors::RenderError;
use crate::geometry::aspect_fit;
use crate::render::backend::{Surface, TextRun};
use crate::render::text_layout;
use crate::render::Color;
use serde::Serialize;
use std::fmt;

/// Identifies the scene element a diagnostic belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ElementRef {
    Image { index: usize, key: String },
    Text { index: usize },
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Image { index, key } => write!(f, "image #{index} ({key})"),
            ElementRef::Text { index } => write!(f, "text #{index}"),
        }
    }
}

/// An element that could not be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub element: ElementRef,
    pub error: RenderError,
}

/// Outcome of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Images skipped because their load has not completed yet.
    pub pending_images: usize,
    pub images_drawn: usize,
    pub texts_drawn: usize,
}

impl RenderReport {
    /// True if every element was drawn.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty() && self.pending_images == 0
    }

    fn record(&mut self, element: ElementRef, error: RenderError) {
        log::warn!("skipping {element}: {error}");
        self.diagnostics.push(Diagnostic { element, error });
    }
}

enum ImageOutcome {
    Drawn,
    Pending,
}

/// Draws card scenes onto surfaces.
#[derive(Debug, Clone)]
pub struct DrawPipeline {
    background: Color,
    card_width: f32,
}

impl DrawPipeline {
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        if !(config.card_width.is_finite() && config.card_width > 0.0) {
            return Err(RenderError::InvalidDimension(format!(
                "card width must be positive, got {}",
                config.card_width
            )));
        }

        Ok(Self {
            background: Color::parse(&config.background)?,
            card_width: config.card_width,
        })
    }

    /// Renders `scene` onto `surface`, resolving images through `cache`.
    ///
    /// Scene coordinates are native card units; the surface is scaled so the card width
    /// spans the surface width. Images whose load is still pending are skipped and counted
    /// in the report.
    pub fn render(&self, surface: &mut dyn Surface, scene: &CardScene, cache: &mut ImageCache) -> RenderReport {
        let mut report = RenderReport::default();

        let size = surface.size();
        surface.set_scale(size.width as f32 / self.card_width);
        surface.clear(self.background);

        for (index, image) in scene.images.iter().enumerate() {
            match draw_image(surface, image, cache) {
                Ok(ImageOutcome::Drawn) => report.images_drawn += 1,
                Ok(ImageOutcome::Pending) => report.pending_images += 1,
                Err(e) => report.record(
                    ElementRef::Image {
                        index,
                        key: image.key.clone(),
                    },
                    e,
                ),
            }
        }

        for (index, block) in scene.texts.iter().enumerate() {
            match draw_text(surface, block) {
                Ok(()) => report.texts_drawn += 1,
                Err(e) => report.record(ElementRef::Text { index }, e),
            }
        }

        log::debug!(
            "render pass: {} images, {} texts, {} pending, {} failed",
            report.images_drawn,
            report.texts_drawn,
            report.pending_images,
            report.diagnostics.len()
        );
        report
    }
}

fn draw_image(surface: &mut dyn Surface, image: &ImageRef, cache: &mut ImageCache) -> Result<ImageOutcome, RenderError> {
    let handle = cache.resolve(&image.key);
    let pixels = match handle.state() {
        ImageState::Pending => return Ok(ImageOutcome::Pending),
        ImageState::Failed(reason) => {
            return Err(RenderError::ResourceLoadFailure {
                key: image.key.clone(),
                reason,
            })
        }
        ImageState::Ready(pixels) => pixels,
    };

    let (natural_w, natural_h) = (pixels.width as f32, pixels.height as f32);
    let fitted = aspect_fit(
        natural_w,
        natural_h,
        image.max_width.unwrap_or(natural_w),
        image.max_height.unwrap_or(natural_h),
    )?;

    surface.draw_image(&pixels, image.x, image.y, fitted.width, fitted.height);
    Ok(ImageOutcome::Drawn)
}

fn draw_text(surface: &mut dyn Surface, block: &TextBlockSpec) -> Result<(), RenderError> {
    let fill = Color::parse(&block.fill_color)?;
    let stroke = block
        .stroke
        .as_ref()
        .map(|s| Color::parse(&s.color).map(|color| (color, s.width)))
        .transpose()?;

    let layout = text_layout::layout(block, |text| surface.measure_text(text, &block.font))?;

    // Wrapped lines already fit; a single line is condensed to max_width instead.
    let max_width = (!layout.wrapped).then_some(block.max_width);

    for line in &layout.lines {
        let run = TextRun {
            text: &line.text,
            x: line.baseline_x,
            y: line.baseline_y,
            font: &block.font,
            max_width,
        };
        surface.fill_text(&run, fill)?;
        if let Some((color, width)) = stroke {
            surface.stroke_text(&run, color, width)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::decode::tests::png_bytes;
    use crate::assets::MemoryLoader;
    use crate::card::{FontSpec, ImageRef};
    use crate::geometry::BoundingConstraint;
    use crate::render::backends::recording::{RecordingBackend, RecordingSurface, SyntheticMetrics};
    use crate::render::{DisplayItem, RenderBackend, SurfaceSize};
    use std::sync::Arc;
    use std::time::Duration;

    fn config() -> RendererConfig {
        RendererConfig {
            card_width: 100.0,
            card_height: 100.0,
            ..RendererConfig::default()
        }
    }

    fn cache(loader: MemoryLoader) -> ImageCache {
        ImageCache::new(Arc::new(loader), tokio::runtime::Handle::current(), Duration::from_secs(5))
    }

    fn items(surface: &dyn Surface) -> Vec<DisplayItem> {
        surface
            .as_any()
            .downcast_ref::<RecordingSurface>()
            .unwrap()
            .render_list()
            .items
            .clone()
    }

    fn scene() -> CardScene {
        let mut scene = CardScene::new();
        scene.push_image(ImageRef::bounded("portrait", 10.0, 10.0, BoundingConstraint::new(40.0, 40.0)));
        scene.push_text(
            TextBlockSpec::new("Pikachu", 5.0, 90.0, 80.0, FontSpec::new("Futura", 10.0)).with_stroke("white", 1.0),
        );
        scene
    }

    #[tokio::test]
    async fn draws_in_order_once_loaded() {
        let mut loader = MemoryLoader::new();
        loader.insert("portrait", png_bytes(20, 10, [0, 0, 255, 255]));
        let mut cache = cache(loader);
        cache.resolve("portrait");
        cache.settle().await;

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let mut surface = RecordingBackend::new().create_surface(SurfaceSize::new(200, 200)).unwrap();
        let report = pipeline.render(surface.as_mut(), &scene(), &mut cache);

        assert!(report.is_complete());
        assert_eq!((report.images_drawn, report.texts_drawn), (1, 1));

        let items = items(surface.as_ref());
        assert!(matches!(items[0], DisplayItem::Clear { .. }));
        // 20x10 fitted into 40x40 is 40x20, at scale 2.
        assert_eq!(
            items[1],
            DisplayItem::Image { x: 20.0, y: 20.0, w: 80.0, h: 40.0, src_width: 20, src_height: 10 }
        );
        assert!(matches!(&items[2], DisplayItem::FillText { text, .. } if text == "Pikachu"));
        assert!(matches!(&items[3], DisplayItem::StrokeText { width, .. } if *width == 2.0));
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn pending_image_is_skipped_not_failed() {
        let mut loader = MemoryLoader::new();
        loader.insert("portrait", png_bytes(4, 4, [0, 0, 0, 255]));
        let mut cache = cache(loader);

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let mut surface = RecordingBackend::new().create_surface(SurfaceSize::new(100, 100)).unwrap();
        let report = pipeline.render(surface.as_mut(), &scene(), &mut cache);

        assert_eq!(report.pending_images, 1);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.texts_drawn, 1);
    }

    #[tokio::test]
    async fn failed_image_is_isolated() {
        let mut cache = cache(MemoryLoader::new());
        cache.resolve("portrait");
        cache.settle().await;

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let mut surface = RecordingBackend::new().create_surface(SurfaceSize::new(100, 100)).unwrap();
        let report = pipeline.render(surface.as_mut(), &scene(), &mut cache);

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(
            report.diagnostics[0].element,
            ElementRef::Image { index: 0, key: "portrait".to_string() }
        );
        assert!(matches!(report.diagnostics[0].error, RenderError::ResourceLoadFailure { .. }));

        let rec = surface.as_any().downcast_ref::<RecordingSurface>().unwrap();
        assert!(matches!(rec.render_list().items[0], DisplayItem::Clear { .. }));
        assert_eq!(rec.render_list().image_count(), 0);
        assert_eq!(report.texts_drawn, 1);
    }

    #[tokio::test]
    async fn unavailable_font_skips_only_that_block() {
        let mut scene = CardScene::new();
        scene.push_text(TextBlockSpec::new("lost", 0.0, 10.0, 50.0, FontSpec::new("Missing", 10.0)));
        scene.push_text(TextBlockSpec::new("kept", 0.0, 20.0, 50.0, FontSpec::new("Present", 10.0)));

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let backend = RecordingBackend::new().with_unavailable_font("Missing");
        let mut surface = backend.create_surface(SurfaceSize::new(100, 100)).unwrap();
        let report = pipeline.render(surface.as_mut(), &scene, &mut cache(MemoryLoader::new()));

        assert_eq!(report.texts_drawn, 1);
        assert_eq!(report.diagnostics[0].element, ElementRef::Text { index: 0 });
        assert!(matches!(report.diagnostics[0].error, RenderError::MeasurementUnavailable { .. }));

        let binding = items(surface.as_ref());
        let texts: Vec<&DisplayItem> = binding.iter().filter(|i| matches!(i, DisplayItem::FillText { .. })).collect();
        assert_eq!(texts.len(), 1);
    }

    #[tokio::test]
    async fn zero_width_stroke_is_not_an_error() {
        let mut scene = CardScene::new();
        scene.push_text(TextBlockSpec::new("HP 60", 0.0, 10.0, 50.0, FontSpec::new("Futura", 10.0)).with_stroke("red", 0.0));

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let mut surface = RecordingBackend::new().create_surface(SurfaceSize::new(100, 100)).unwrap();
        let report = pipeline.render(surface.as_mut(), &scene, &mut cache(MemoryLoader::new()));

        assert!(report.is_complete());
        assert!(items(surface.as_ref()).iter().all(|i| !matches!(i, DisplayItem::StrokeText { .. })));
    }

    #[tokio::test]
    async fn wrapped_block_draws_every_line_without_condensing() {
        let mut scene = CardScene::new();
        // 10 units per character at size 10: "the quick" and "brown fox" are 90 wide.
        scene.push_text(
            TextBlockSpec::new("the quick brown fox", 0.0, 80.0, 100.0, FontSpec::new("Futura", 10.0)).wrapped(),
        );

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let metrics = SyntheticMetrics {
            advance: 1.0,
            ascent: 0.7,
            descent: 0.3,
        };
        let mut surface = RecordingBackend::new()
            .with_metrics(metrics)
            .create_surface(SurfaceSize::new(100, 100))
            .unwrap();
        pipeline.render(surface.as_mut(), &scene, &mut cache(MemoryLoader::new()));

        let list = items(surface.as_ref());
        let lines: Vec<(String, f32, Option<f32>)> = list
            .iter()
            .filter_map(|i| match i {
                DisplayItem::FillText { text, y, max_width, .. } => Some((text.clone(), *y, *max_width)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lines,
            vec![
                ("the quick".to_string(), 70.0, None),
                ("brown fox".to_string(), 80.0, None),
            ]
        );
    }

    #[tokio::test]
    async fn bad_color_is_isolated() {
        let mut scene = CardScene::new();
        scene.push_text(TextBlockSpec::new("x", 0.0, 10.0, 50.0, FontSpec::new("Futura", 10.0)).with_fill("not-a-color"));

        let pipeline = DrawPipeline::new(&config()).unwrap();
        let mut surface = RecordingBackend::new().create_surface(SurfaceSize::new(100, 100)).unwrap();
        let report = pipeline.render(surface.as_mut(), &scene, &mut cache(MemoryLoader::new()));

        assert!(matches!(report.diagnostics[0].error, RenderError::InvalidColor(_)));
    }

    #[test]
    fn rejects_zero_card_width() {
        let config = RendererConfig {
            card_width: 0.0,
            ..RendererConfig::default()
        };
        assert!(matches!(DrawPipeline::new(&config), Err(RenderError::InvalidDimension(_))));
    }
}
