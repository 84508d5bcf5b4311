pub mod backend;

/// Rendering backends for the card renderer.
pub mod backends;

mod color;
pub use color::Color;

pub mod encode;

mod render_list;
pub use render_list::*;

pub mod pipeline;
pub mod text_layout;

pub use backend::{RenderBackend, RgbaImage, Surface, SurfaceSize, TextMetrics, TextRun};
pub use pipeline::{Diagnostic, DrawPipeline, ElementRef, RenderReport};
