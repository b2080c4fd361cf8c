//! Working-size planning.
//!
//! The per-pixel loops are the expensive part of the pipeline, so the
//! working image is bounded to [`MAX_DIMENSION`] pixels along its longest
//! edge before the transform runs.

use crate::error::EngineError;

/// Longest edge, in pixels, the working image may have.
pub const MAX_DIMENSION: u32 = 3000;

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the longest edge.
    #[inline]
    pub fn max_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Number of pixels, or `None` if it overflows `usize`.
    #[inline]
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// Decide the working dimensions for a source image.
///
/// Sources that fit within [`MAX_DIMENSION`] on both axes are returned
/// unchanged. Larger sources are scaled by `MAX_DIMENSION / longest_edge`
/// with each axis rounded to the nearest pixel (never below 1), so the
/// longest edge becomes exactly `MAX_DIMENSION` and the aspect ratio is kept
/// to within one pixel.
///
/// # Errors
///
/// Returns [`EngineError::ZeroDimension`] if either extent is zero.
///
/// # Example
/// ```
/// use duotone_core::{plan, Dimensions};
///
/// assert_eq!(plan(800, 600).unwrap(), Dimensions::new(800, 600));
/// assert_eq!(plan(9000, 1000).unwrap(), Dimensions::new(3000, 333));
/// ```
pub fn plan(source_width: u32, source_height: u32) -> Result<Dimensions, EngineError> {
    if source_width == 0 || source_height == 0 {
        return Err(EngineError::ZeroDimension {
            width: source_width,
            height: source_height,
        });
    }

    if source_width <= MAX_DIMENSION && source_height <= MAX_DIMENSION {
        return Ok(Dimensions::new(source_width, source_height));
    }

    let longest = source_width.max(source_height) as f64;
    let scale = MAX_DIMENSION as f64 / longest;

    Ok(Dimensions::new(
        scale_axis(source_width, scale),
        scale_axis(source_height, scale),
    ))
}

#[inline]
fn scale_axis(extent: u32, scale: f64) -> u32 {
    ((extent as f64 * scale).round() as u32).clamp(1, MAX_DIMENSION)
}
