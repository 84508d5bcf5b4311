//! Owns the output surface and decides when to render.
//!
//! [`CardRenderer`] keeps the latest card scene and output constraints, and renders only
//! when one of them changed or an image finished loading. Every pass that runs hands
//! exactly one encoded PNG to the sink.

mod handle;
mod worker;

pub use handle::RendererHandle;
pub use worker::RenderWorker;

use crate::assets::{ImageCache, ImageLoader, LoadCompletion};
use crate::card::{Card, CardScene};
use crate::config::RendererConfig;
use crate::errors::RenderError;
use crate::geometry::{aspect_fit, BoundingConstraint};
use crate::render::{DrawPipeline, RenderBackend, RenderReport, Surface, SurfaceSize};
use crate::tick::{DirtyFlags, RenderStatus, TickResult};
use std::sync::Arc;
use tokio::runtime::Handle;

/// One finished render pass.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Increments with every pass, starting at 1
    pub epoch: u64,
    pub size: SurfaceSize,
    pub png: Vec<u8>,
    pub report: RenderReport,
}

/// Receives every finished render pass.
pub type RenderSink = Box<dyn FnMut(RenderOutput) + Send>;

pub struct CardRenderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    pipeline: DrawPipeline,
    cache: ImageCache,
    surface: Option<Box<dyn Surface>>,
    sink: RenderSink,
    scene: Option<CardScene>,
    constraints: Option<BoundingConstraint>,
    dirty: DirtyFlags,
    epoch: u64,
}

impl CardRenderer {
    /// Creates a renderer. Image loads are spawned on `runtime`.
    pub fn new(
        config: RendererConfig,
        backend: Box<dyn RenderBackend>,
        loader: Arc<dyn ImageLoader>,
        runtime: Handle,
        sink: RenderSink,
    ) -> Result<Self, RenderError> {
        let pipeline = DrawPipeline::new(&config)?;
        let cache = ImageCache::new(loader, runtime, config.image_load_timeout);
        log::debug!("card renderer using {}", backend.name());

        Ok(Self {
            config,
            backend,
            pipeline,
            cache,
            surface: None,
            sink,
            scene: None,
            constraints: None,
            dirty: DirtyFlags::default(),
            epoch: 0,
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replaces the scene. Returns false, and leaves the renderer clean, if it is unchanged.
    pub fn set_scene(&mut self, scene: CardScene) -> bool {
        if self.scene.as_ref() == Some(&scene) {
            return false;
        }
        self.scene = Some(scene);
        self.dirty.scene = true;
        true
    }

    /// Replaces the scene with the default layout of `card`.
    pub fn set_card(&mut self, card: &Card) -> bool {
        self.set_scene(card.scene())
    }

    /// Replaces the output bounds. Returns whether they changed.
    pub fn set_constraints(&mut self, constraints: BoundingConstraint) -> Result<bool, RenderError> {
        // Reject bounds that can never produce a surface.
        self.surface_size_for(constraints)?;

        if self.constraints == Some(constraints) {
            return Ok(false);
        }
        self.constraints = Some(constraints);
        self.dirty.constraints = true;
        Ok(true)
    }

    /// Forces the next tick to render.
    pub fn invalidate(&mut self) {
        self.dirty.forced = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.any()
    }

    pub fn scene(&self) -> Option<&CardScene> {
        self.scene.as_ref()
    }

    pub fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ImageCache {
        &mut self.cache
    }

    /// Number of passes delivered to the sink so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Applies a finished image load. The output is stale only if the current scene
    /// draws that image.
    pub fn apply_completion(&mut self, completion: LoadCompletion) {
        let key = completion.key.clone();
        self.cache.apply(completion);
        if self.references(&key) {
            self.dirty.images = true;
        }
    }

    /// Whether the current scene draws the image `key`.
    fn references(&self, key: &str) -> bool {
        self.scene
            .as_ref()
            .is_some_and(|scene| scene.images.iter().any(|image| image.key == key))
    }

    /// Starts loading every image the current scene references.
    pub fn prefetch(&mut self) {
        if let Some(scene) = &self.scene {
            for image in &scene.images {
                self.cache.resolve(&image.key);
            }
        }
    }

    /// Applies finished loads and renders if anything changed.
    ///
    /// Only a surface that cannot be created, resized or encoded fails the tick; element
    /// failures are reported in the output instead. A failed tick stays dirty.
    pub fn tick(&mut self) -> Result<TickResult, RenderError> {
        let applied = self.cache.poll_completions();
        if applied.iter().any(|key| self.references(key)) {
            self.dirty.images = true;
        }
        let mut result = TickResult {
            loads_applied: applied.len(),
            ..TickResult::default()
        };

        let Some(constraints) = self.constraints else {
            return Ok(result);
        };
        if self.scene.is_none() || !self.dirty.any() {
            return Ok(result);
        }

        let size = self.surface_size_for(constraints)?;
        result.resized = self.ensure_surface(size)?;

        let (Some(surface), Some(scene)) = (self.surface.as_mut(), self.scene.as_ref()) else {
            return Ok(result);
        };
        let report = self.pipeline.render(surface.as_mut(), scene, &mut self.cache);
        let png = surface
            .encode_png()
            .map_err(|e| RenderError::Surface(format!("encoding failed: {e}")))?;

        self.dirty.clear();
        self.epoch += 1;

        result.rendered = true;
        result.pending_images = report.pending_images;
        result.status = if report.pending_images > 0 {
            RenderStatus::Partial
        } else {
            RenderStatus::Rendered
        };

        log::debug!("render pass {} at {}x{}", self.epoch, size.width, size.height);
        (self.sink)(RenderOutput {
            epoch: self.epoch,
            size,
            png,
            report,
        });

        Ok(result)
    }

    /// Waits for every image of the current scene to finish loading, then ticks.
    pub async fn settle(&mut self) -> Result<TickResult, RenderError> {
        self.prefetch();
        let waiting = self.scene.as_ref().is_some_and(|scene| {
            scene
                .images
                .iter()
                .any(|image| self.cache.get(&image.key).is_some_and(|h| h.is_pending()))
        });
        if waiting {
            self.cache.settle().await;
            self.dirty.images = true;
        }
        self.tick()
    }

    fn surface_size_for(&self, constraints: BoundingConstraint) -> Result<SurfaceSize, RenderError> {
        let fitted = aspect_fit(
            self.config.card_width,
            self.config.card_height,
            constraints.max_width,
            constraints.max_height,
        )?;
        Ok(fitted.into())
    }

    /// Creates the surface or resizes it to `size`. Returns whether anything changed.
    fn ensure_surface(&mut self, size: SurfaceSize) -> Result<bool, RenderError> {
        match &mut self.surface {
            Some(surface) if surface.size() == size => Ok(false),
            Some(surface) => {
                log::debug!("resizing surface to {}x{}", size.width, size.height);
                surface
                    .resize(size)
                    .map_err(|e| RenderError::Surface(format!("cannot resize surface: {e}")))?;
                Ok(true)
            }
            None => {
                log::debug!("creating {}x{} surface on {}", size.width, size.height, self.backend.name());
                let surface = self
                    .backend
                    .create_surface(size)
                    .map_err(|e| RenderError::Surface(format!("cannot create surface: {e}")))?;
                self.surface = Some(surface);
                Ok(true)
            }
        }
    }
}
