//! Duotone ramp endpoints
//!
//! The ramp runs between two fixed sRGB colors. They are used as 8-bit
//! values directly; no gamma decoding happens before interpolation.

use std::fmt;

/// An endpoint of the duotone color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuotoneColor {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl DuotoneColor {
    /// Dark green, `#1b602f`. Takes the shadows unless reversed.
    pub const SHADOW: Self = Self::new(27, 96, 47);

    /// Pink, `#f784c5`. Takes the highlights unless reversed.
    pub const HIGHLIGHT: Self = Self::new(247, 132, 197);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a byte array `[R, G, B]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Interpolate from `self` towards `other` by `t`.
    ///
    /// `t = 0` yields `self`, `t = 1` yields `other`. Each channel is rounded
    /// half away from zero and clamped to 0..=255, so an out-of-range `t`
    /// can never wrap.
    ///
    /// # Example
    /// ```
    /// use duotone_core::DuotoneColor;
    ///
    /// let mid = DuotoneColor::SHADOW.lerp(DuotoneColor::HIGHLIGHT, 0.5);
    /// assert_eq!(mid, [137, 114, 122]);
    /// ```
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> [u8; 3] {
        [
            lerp_channel(self.r, other.r, t),
            lerp_channel(self.g, other.g, t),
            lerp_channel(self.b, other.b, t),
        ]
    }
}

#[inline]
fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let from = from as f64;
    let value = from + t * (to as f64 - from);
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for DuotoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Select the `(dark, bright)` endpoints for an orientation.
///
/// With `reversed == false` the dark end is [`DuotoneColor::SHADOW`];
/// with `reversed == true` the roles are swapped.
#[inline]
pub fn endpoints(reversed: bool) -> (DuotoneColor, DuotoneColor) {
    if reversed {
        (DuotoneColor::HIGHLIGHT, DuotoneColor::SHADOW)
    } else {
        (DuotoneColor::SHADOW, DuotoneColor::HIGHLIGHT)
    }
}
