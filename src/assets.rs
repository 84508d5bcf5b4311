//! Image loading and caching.

pub mod decode;
pub mod image_cache;
pub mod loader;

pub use image_cache::{ImageCache, ImageHandle, ImageState, LoadCompletion};
pub use loader::{ImageLoader, MemoryLoader, SourceLoader};
