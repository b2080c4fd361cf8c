//! Contrast-enhancement S-curve.

/// Exponent of the S-curve. Fixed so that output stays byte-compatible.
pub const CONTRAST_EXPONENT: f64 = 1.8;

/// Push a normalized value away from the midpoint.
///
/// ```text
/// n < 0.5:  f(n) = (2n)^1.8 / 2
/// n ≥ 0.5:  f(n) = 1 - (2(1 - n))^1.8 / 2
/// ```
///
/// The curve is symmetric around `(0.5, 0.5)`, strictly increasing on
/// `[0, 1]`, and fixes `0`, `0.5` and `1`. Input is expected in `[0, 1]`;
/// the transform clamps before calling.
///
/// # Example
/// ```
/// use duotone_core::enhance_contrast;
///
/// assert_eq!(enhance_contrast(0.0), 0.0);
/// assert_eq!(enhance_contrast(0.5), 0.5);
/// assert_eq!(enhance_contrast(1.0), 1.0);
/// assert!(enhance_contrast(0.25) < 0.25);
/// assert!(enhance_contrast(0.75) > 0.75);
/// ```
#[inline]
pub fn enhance_contrast(n: f64) -> f64 {
    if n < 0.5 {
        (n * 2.0).powf(CONTRAST_EXPONENT) / 2.0
    } else {
        1.0 - ((1.0 - n) * 2.0).powf(CONTRAST_EXPONENT) / 2.0
    }
}
