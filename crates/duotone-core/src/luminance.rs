//! Rec. 709 luminance and per-image range discovery.

use crate::buffer::CHANNELS;

/// Rec. 709 weights for R, G and B.
pub const REC709_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Weighted luminance of an 8-bit RGB triple, in `0.0..=255.0`.
///
/// Computed on the stored sRGB values without gamma decoding and without
/// rounding.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    REC709_WEIGHTS[0] * r as f64 + REC709_WEIGHTS[1] * g as f64 + REC709_WEIGHTS[2] * b as f64
}

/// Minimum and maximum luminance observed across one buffer.
///
/// A range belongs to the image it was scanned from and must be recomputed
/// for every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminanceRange {
    pub min: f64,
    pub max: f64,
}

impl LuminanceRange {
    /// Scan an RGBA byte slice and record the luminance extremes.
    ///
    /// The scan starts from `min = 255, max = 0`, so an empty slice returns
    /// that inverted range unchanged. Trailing bytes that do not form a full
    /// pixel are ignored.
    pub fn scan(pixels: &[u8]) -> Self {
        let mut min = 255.0f64;
        let mut max = 0.0f64;

        for px in pixels.chunks_exact(CHANNELS) {
            let l = luminance(px[0], px[1], px[2]);
            if l < min {
                min = l;
            }
            if l > max {
                max = l;
            }
        }

        Self { min, max }
    }

    /// True when every scanned pixel had the same luminance.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.max - self.min == 0.0
    }

    /// Divisor used for normalization. A flat range uses 1 instead of 0.
    #[inline]
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            1.0
        } else {
            span
        }
    }

    /// Stretch a luminance value into `[0, 1]` relative to this range.
    #[inline]
    pub fn normalize(&self, l: f64) -> f64 {
        ((l - self.min) / self.span()).clamp(0.0, 1.0)
    }
}
