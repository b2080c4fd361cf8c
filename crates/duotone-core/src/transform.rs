//! The two-pass duotone transform.
//!
//! Pass 1 reduces the buffer to its [`LuminanceRange`]; pass 2 maps every
//! pixel through normalize -> S-curve -> color interpolation. Pass 2 needs
//! the global extremes, so the passes cannot be fused.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::endpoints;
use crate::curve::enhance_contrast;
use crate::error::EngineError;
use crate::luminance::{luminance, LuminanceRange};

/// Rewrite the RGB channels of `buffer` in place.
///
/// Alpha is left untouched. The output is a pure function of the pixel
/// values and `reversed`. Returns the luminance range observed in pass 1.
///
/// A [`PixelBuffer`] is valid by construction, so this cannot fail; use
/// [`transform_rgba`] for unchecked byte slices.
pub fn transform(buffer: &mut PixelBuffer, reversed: bool) -> LuminanceRange {
    apply(buffer.as_bytes_mut(), reversed)
}

/// Rewrite a raw RGBA byte slice in place.
///
/// # Errors
///
/// - [`EngineError::EmptyBuffer`] if `pixels` is empty
/// - [`EngineError::MisalignedBuffer`] if its length is not a multiple of 4
///
/// Validation happens before the first write: on error the slice is
/// unchanged.
///
/// # Example
/// ```
/// use duotone_core::transform_rgba;
///
/// let mut pixels = [0, 0, 0, 255, 255, 255, 255, 255];
/// transform_rgba(&mut pixels, true).unwrap();
/// assert_eq!(pixels, [247, 132, 197, 255, 27, 96, 47, 255]);
/// ```
pub fn transform_rgba(pixels: &mut [u8], reversed: bool) -> Result<LuminanceRange, EngineError> {
    if pixels.is_empty() {
        return Err(EngineError::EmptyBuffer);
    }
    if pixels.len() % CHANNELS != 0 {
        return Err(EngineError::MisalignedBuffer { len: pixels.len() });
    }
    Ok(apply(pixels, reversed))
}

/// Fraction of the way from the dark endpoint to the bright endpoint for a
/// pixel of luminance `l` in an image with `range`.
///
/// Independent of orientation.
#[inline]
pub fn interpolation_fraction(l: f64, range: &LuminanceRange) -> f64 {
    enhance_contrast(range.normalize(l))
}

fn apply(pixels: &mut [u8], reversed: bool) -> LuminanceRange {
    let range = LuminanceRange::scan(pixels);
    let (dark, bright) = endpoints(reversed);

    for px in pixels.chunks_exact_mut(CHANNELS) {
        let l = luminance(px[0], px[1], px[2]);
        let t = interpolation_fraction(l, &range);
        let [r, g, b] = dark.lerp(bright, t);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }

    range
}
