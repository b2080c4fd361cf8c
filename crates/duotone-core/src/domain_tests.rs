//! Domain-critical regression tests for duotone-core.
//!
//! These tests are designed to catch specific classes of bugs, not just
//! confirm happy paths. Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::buffer::PixelBuffer;
    use crate::color::DuotoneColor;
    use crate::luminance::{luminance, LuminanceRange};
    use crate::planner::{plan, Dimensions, MAX_DIMENSION};
    use crate::transform::{interpolation_fraction, transform, transform_rgba};

    /// Deterministic pseudo-random RGBA bytes (xorshift32), so failures
    /// reproduce exactly.
    fn noise_pixels(count: usize, seed: u32) -> Vec<u8> {
        let mut state = seed.max(1);
        let mut out = Vec::with_capacity(count * 4);
        for _ in 0..count * 4 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            out.push((state >> 24) as u8);
        }
        out
    }

    /// Horizontal grey ramp with varying alpha.
    fn grey_ramp(width: u32) -> PixelBuffer {
        let data = (0..width)
            .flat_map(|x| {
                let v = (x * 255 / (width - 1).max(1)) as u8;
                [v, v, v, (x % 256) as u8]
            })
            .collect();
        PixelBuffer::new(width, 1, data).unwrap()
    }

    fn expected_channel(from: u8, to: u8, t: f64) -> f64 {
        from as f64 + t * (to as f64 - from as f64)
    }

    // ========================================================================
    // GAP 1: Alpha must never be touched
    // ========================================================================

    /// If this breaks, it means: the transform is writing to the fourth
    /// channel (e.g. iterating with the wrong stride or remapping RGBA as
    /// four color channels), which would flatten transparency in exports.
    #[test]
    fn test_alpha_invariance() {
        for seed in [1, 7, 42, 9001] {
            let original = noise_pixels(512, seed);
            for reversed in [false, true] {
                let mut pixels = original.clone();
                transform_rgba(&mut pixels, reversed).unwrap();
                for (i, (out, inp)) in pixels.chunks(4).zip(original.chunks(4)).enumerate() {
                    assert_eq!(
                        out[3], inp[3],
                        "REGRESSION: alpha changed at pixel {i} (seed {seed}, reversed {reversed})"
                    );
                }
            }
        }
    }

    // ========================================================================
    // GAP 2: Outputs must stay on the ramp between the two endpoints
    // ========================================================================

    /// If this breaks, it means: interpolation overshoots the endpoints,
    /// most likely because normalization is no longer clamped or the curve
    /// leaves [0, 1]. Every channel must lie between the two endpoint values
    /// for that channel (which also implies the [0, 255] range).
    #[test]
    fn test_outputs_stay_between_endpoints() {
        let (s, h) = (DuotoneColor::SHADOW, DuotoneColor::HIGHLIGHT);
        let bounds = [
            (s.r.min(h.r), s.r.max(h.r)),
            (s.g.min(h.g), s.g.max(h.g)),
            (s.b.min(h.b), s.b.max(h.b)),
        ];

        for seed in [3, 11, 12345] {
            for reversed in [false, true] {
                let mut pixels = noise_pixels(1024, seed);
                transform_rgba(&mut pixels, reversed).unwrap();
                for px in pixels.chunks(4) {
                    for c in 0..3 {
                        assert!(
                            px[c] >= bounds[c].0 && px[c] <= bounds[c].1,
                            "REGRESSION: channel {c} value {} outside [{}, {}]",
                            px[c],
                            bounds[c].0,
                            bounds[c].1
                        );
                    }
                }
            }
        }
    }

    // ========================================================================
    // GAP 3: Orientation only swaps endpoints, never the normalization
    // ========================================================================

    /// If this breaks, it means: the reversed path computes a different
    /// normalized luminance than the normal path (e.g. inverting luminance
    /// instead of swapping colors), so the two renditions no longer share
    /// the same tonal structure. For each pixel both results must match
    /// their closed forms using one shared fraction t.
    #[test]
    fn test_orientation_symmetry() {
        let (s, h) = (DuotoneColor::SHADOW, DuotoneColor::HIGHLIGHT);
        let original = noise_pixels(2048, 77);
        let range = LuminanceRange::scan(&original);

        let mut normal = original.clone();
        let mut reversed = original.clone();
        transform_rgba(&mut normal, false).unwrap();
        transform_rgba(&mut reversed, true).unwrap();

        let channels = |c: DuotoneColor| [c.r, c.g, c.b];
        for ((src, n), r) in original
            .chunks(4)
            .zip(normal.chunks(4))
            .zip(reversed.chunks(4))
        {
            let t = interpolation_fraction(luminance(src[0], src[1], src[2]), &range);
            for c in 0..3 {
                let want_normal = expected_channel(channels(s)[c], channels(h)[c], t);
                let want_reversed = expected_channel(channels(h)[c], channels(s)[c], t);
                assert!(
                    (n[c] as f64 - want_normal).abs() <= 0.5,
                    "REGRESSION: normal channel {c} = {}, expected {want_normal}",
                    n[c]
                );
                assert!(
                    (r[c] as f64 - want_reversed).abs() <= 0.5,
                    "REGRESSION: reversed channel {c} = {}, expected {want_reversed}",
                    r[c]
                );
            }
        }
    }

    /// If this breaks, it means: the endpoint of one orientation is no
    /// longer the start of the other. Pixels that land exactly on an
    /// endpoint must swap colors when the flag flips.
    #[test]
    fn test_orientation_swaps_exact_endpoints() {
        let data = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let mut normal = PixelBuffer::new(2, 1, data.clone()).unwrap();
        let mut reversed = PixelBuffer::new(2, 1, data).unwrap();
        transform(&mut normal, false);
        transform(&mut reversed, true);

        assert_eq!(normal.pixel(0, 0), reversed.pixel(1, 0));
        assert_eq!(normal.pixel(1, 0), reversed.pixel(0, 0));
        assert_eq!(normal.pixel(0, 0), [27, 96, 47, 255]);
        assert_eq!(normal.pixel(1, 0), [247, 132, 197, 255]);
    }

    // ========================================================================
    // GAP 4: Flat images must not divide by zero
    // ========================================================================

    /// If this breaks, it means: a zero luminance range produced NaN or
    /// infinity (0/0 or x/0), which casts to 0 or 255 unpredictably. A flat
    /// image must become one uniform shadow-side color.
    #[test]
    fn test_flat_image_is_uniform_shadow() {
        for grey in [0u8, 1, 128, 254, 255] {
            for (reversed, expected) in [
                (false, DuotoneColor::SHADOW),
                (true, DuotoneColor::HIGHLIGHT),
            ] {
                let mut buffer = PixelBuffer::filled(16, 9, [grey, grey, grey, 200]).unwrap();
                let range = transform(&mut buffer, reversed);
                assert!(range.is_flat());
                for px in buffer.as_bytes().chunks(4) {
                    assert_eq!(
                        px,
                        [expected.r, expected.g, expected.b, 200],
                        "REGRESSION: flat grey {grey} (reversed {reversed}) not uniform"
                    );
                }
            }
        }
    }

    /// If this breaks, it means: a one-pixel image (min == max) no longer
    /// normalizes to 0. Mid grey must come out as the shadow color.
    #[test]
    fn test_single_pixel_scenario() {
        let mut pixels = [128, 128, 128, 255];
        transform_rgba(&mut pixels, false).unwrap();
        assert_eq!(pixels, [27, 96, 47, 255]);
    }

    // ========================================================================
    // GAP 5: Brighter input never gets a smaller fraction
    // ========================================================================

    /// If this breaks, it means: the curve or normalization lost
    /// monotonicity, producing tone inversions (banding where a brighter
    /// region renders darker than its neighbor).
    #[test]
    fn test_monotonic_on_grey_ramp() {
        let mut buffer = grey_ramp(256);
        transform(&mut buffer, false);

        // With Shadow -> Highlight every channel increases, so each output
        // channel must be non-decreasing along the ramp.
        let mut prev = buffer.pixel(0, 0);
        for x in 1..256 {
            let cur = buffer.pixel(x, 0);
            for c in 0..3 {
                assert!(
                    cur[c] >= prev[c],
                    "REGRESSION: channel {c} decreased at x={x}: {} -> {}",
                    prev[c],
                    cur[c]
                );
            }
            prev = cur;
        }
    }

    #[test]
    fn test_fraction_monotonic_in_luminance() {
        let original = noise_pixels(4096, 5);
        let range = LuminanceRange::scan(&original);
        let mut samples: Vec<(f64, f64)> = original
            .chunks(4)
            .map(|p| {
                let l = luminance(p[0], p[1], p[2]);
                (l, interpolation_fraction(l, &range))
            })
            .collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in samples.windows(2) {
            assert!(
                pair[1].1 >= pair[0].1,
                "REGRESSION: L {} -> t {}, but L {} -> t {}",
                pair[0].0,
                pair[0].1,
                pair[1].0,
                pair[1].1
            );
        }
    }

    // ========================================================================
    // GAP 6: The range is per image, never shared
    // ========================================================================

    /// If this breaks, it means: luminance extremes leaked from one call
    /// into the next (e.g. cached in a static). A low-contrast image must be
    /// stretched to the full ramp regardless of what was processed before.
    #[test]
    fn test_range_recomputed_per_call() {
        let mut wide = [0, 0, 0, 255, 255, 255, 255, 255];
        transform_rgba(&mut wide, false).unwrap();

        let mut narrow = [100, 100, 100, 255, 110, 110, 110, 255];
        let range = transform_rgba(&mut narrow, false).unwrap();

        assert!((range.min - 100.0).abs() < 1e-9);
        assert!((range.max - 110.0).abs() < 1e-9);
        assert_eq!(&narrow[0..4], &[27, 96, 47, 255]);
        assert_eq!(&narrow[4..8], &[247, 132, 197, 255]);
    }

    // ========================================================================
    // GAP 7: Determinism, and the transform is not idempotent
    // ========================================================================

    #[test]
    fn test_deterministic() {
        let original = noise_pixels(1000, 99);
        let mut a = original.clone();
        let mut b = original.clone();
        transform_rgba(&mut a, true).unwrap();
        transform_rgba(&mut b, true).unwrap();
        assert_eq!(a, b);
    }

    /// If this breaks, it means: a second application returned its input,
    /// which would only happen if the transform were a projection onto the
    /// two endpoint colors. Re-applying must re-stretch the duotone's own
    /// luminance range and change the mid-tones.
    #[test]
    fn test_not_idempotent() {
        let original = noise_pixels(1000, 21);
        let mut once = original.clone();
        transform_rgba(&mut once, false).unwrap();
        assert_ne!(once, original, "first pass should change a noisy image");

        let mut twice = once.clone();
        transform_rgba(&mut twice, false).unwrap();
        assert_ne!(
            twice, once,
            "REGRESSION: applying the duotone twice was a no-op"
        );
    }

    // ========================================================================
    // GAP 8: Planner bounds the working size
    // ========================================================================

    #[test]
    fn test_planner_scenarios() {
        let wide = plan(9000, 1000).unwrap();
        assert_eq!(wide.max_edge(), MAX_DIMENSION);
        assert!((wide.height as f64 - 1000.0 / 3.0).abs() <= 1.0);

        assert_eq!(plan(800, 600).unwrap(), Dimensions::new(800, 600));
    }

    /// If this breaks, it means: planning produced a size whose buffer the
    /// engine would reject, breaking the planner -> transform hand-off.
    #[test]
    fn test_planned_buffer_is_transformable() {
        let dims = plan(7000, 5).unwrap();
        let count = dims.pixel_count().unwrap();
        let mut buffer = PixelBuffer::new(dims.width, dims.height, noise_pixels(count, 8)).unwrap();
        transform(&mut buffer, false);
        assert_eq!(buffer.dimensions(), dims);
    }
}
