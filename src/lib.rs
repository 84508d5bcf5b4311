//! Renders trading cards to PNG.
//!
//! A [`Card`](card::Card) is laid out into a [`CardScene`](card::CardScene) of images and
//! text blocks, drawn by a [`DrawPipeline`](render::DrawPipeline) onto a surface from a
//! [`RenderBackend`](render::RenderBackend), and handed to a sink as PNG bytes by the
//! [`CardRenderer`] whenever the card or its output bounds change.

pub mod assets;
pub mod card;
pub mod config;
pub mod errors;
pub mod event;
pub mod geometry;
pub mod net;
pub mod render;
pub mod renderer;
pub mod tick;

pub use config::RendererConfig;
pub use errors::{LoadError, RenderError};
pub use renderer::*;
