//! duotone-core: two-color luminance remapping for RGBA pixel buffers
//!
//! This crate contains the deterministic part of the duotone pipeline: it
//! decides how large the working image may be, and it rewrites the RGB
//! channels of an RGBA buffer so that dark pixels take one color and bright
//! pixels take another. Decoding, resampling and encoding live with the
//! caller.
//!
//! # Quick Start
//!
//! ```
//! use duotone_core::{plan, transform, DuotoneColor, PixelBuffer};
//!
//! // Source is 4x1: black, dark grey, light grey, white
//! let dims = plan(4, 1).unwrap();
//! let data = vec![
//!     0, 0, 0, 255, //
//!     64, 64, 64, 255, //
//!     192, 192, 192, 255, //
//!     255, 255, 255, 255,
//! ];
//! let mut buffer = PixelBuffer::new(dims.width, dims.height, data).unwrap();
//!
//! transform(&mut buffer, false);
//!
//! assert_eq!(buffer.pixel(0, 0), [27, 96, 47, 255]);
//! assert_eq!(buffer.pixel(3, 0), [247, 132, 197, 255]);
//! assert_eq!(DuotoneColor::SHADOW.to_bytes(), [27, 96, 47]);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! source extents ──> plan() ──> Dimensions (≤ 3000 per edge)
//!                                   |
//!                        caller resamples into PixelBuffer
//!                                   |
//!                                   v
//! pass 1: L = 0.2126 R + 0.7152 G + 0.0722 B   ──> LuminanceRange (min, max)
//!                                   |
//!                                   v
//! pass 2: n = clamp((L - min) / span, 0, 1)
//!         t = enhance_contrast(n)               (S-curve, exponent 1.8)
//!         C = round(shadow.C + t * (highlight.C - shadow.C))
//! ```
//!
//! Luminance is computed from the 8-bit sRGB values directly, in `f64`, and
//! is never rounded between the passes. The observed range is computed per
//! call and never reused for another image.
//!
//! # Orientation
//!
//! The `reversed` flag swaps the two endpoints: with `false` the shadow
//! color ([`DuotoneColor::SHADOW`], `#1b602f`) sits at the dark end and the
//! highlight color ([`DuotoneColor::HIGHLIGHT`], `#f784c5`) at the bright
//! end. Normalization does not depend on orientation, so the interpolation
//! fraction of a pixel is the same in both runs.
//!
//! # Rounding
//!
//! Output channels use [`f64::round`], i.e. round-half-away-from-zero. All
//! interpolated values are non-negative, so this is the same as round-half-up
//! and yields byte-identical output to other implementations that round
//! that way.
//!
//! # Failure
//!
//! The only failure is an unusable buffer (empty, not a multiple of four
//! bytes, or zero extents). It is detected before any byte is written, so a
//! call either rewrites the whole buffer or leaves it untouched.

pub mod buffer;
pub mod color;
pub mod curve;
pub mod error;
pub mod luminance;
pub mod planner;
pub mod transform;

#[cfg(test)]
mod domain_tests;

pub use buffer::{PixelBuffer, CHANNELS};
pub use color::{endpoints, DuotoneColor};
pub use curve::{enhance_contrast, CONTRAST_EXPONENT};
pub use error::EngineError;
pub use luminance::{luminance, LuminanceRange};
pub use planner::{plan, Dimensions, MAX_DIMENSION};
pub use transform::{interpolation_fraction, transform, transform_rgba};
