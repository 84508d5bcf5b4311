//! Sizes and aspect-ratio fitting.
//!
//! [`aspect_fit`] computes the largest size with the source's width:height ratio that fits
//! inside a bounding box. It is used to size the output surface from the caller's
//! constraints and to scale every image a card draws.
//!
//! # Examples
//!
//! ```
//! use card_renderer::geometry::{aspect_fit, Dimensions};
//!
//! let fitted = aspect_fit(100.0, 50.0, 50.0, 50.0).unwrap();
//! assert_eq!(fitted, Dimensions { width: 50.0, height: 25.0 });
//! ```

use crate::errors::RenderError;
use serde::{Deserialize, Serialize};

/// A width/height pair. Both values are finite and strictly positive when produced by
/// [`aspect_fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Maximum size a card (or an image on it) may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingConstraint {
    pub max_width: f32,
    pub max_height: f32,
}

impl BoundingConstraint {
    pub fn new(max_width: f32, max_height: f32) -> Self {
        Self { max_width, max_height }
    }
}

fn check(name: &str, value: f32) -> Result<(), RenderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidDimension(format!("{name} must be finite and positive, got {value}")))
    }
}

/// Returns the largest dimensions with the ratio `source_width:source_height` that fit in
/// `max_width` x `max_height`.
///
/// When the bounding box already has the source ratio, the box itself is returned so no
/// rounding distortion creeps in. Non-finite or non-positive input is rejected rather than
/// clamped.
pub fn aspect_fit(
    source_width: f32,
    source_height: f32,
    max_width: f32,
    max_height: f32,
) -> Result<Dimensions, RenderError> {
    check("source width", source_width)?;
    check("source height", source_height)?;
    check("max width", max_width)?;
    check("max height", max_height)?;

    if max_width * source_height == max_height * source_width {
        return Ok(Dimensions {
            width: max_width,
            height: max_height,
        });
    }

    let ratio = (max_width / source_width).min(max_height / source_height);

    // Multiplication can land a hair above the bound; the bound itself is exact.
    Ok(Dimensions {
        width: (source_width * ratio).min(max_width),
        height: (source_height * ratio).min(max_height),
    })
}
