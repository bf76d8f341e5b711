// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mask compositor — turns a foreground text raster into a transparent
// overlay that can be stacked on top of a picture background.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::contrast::{threshold, ThresholdType};
use tracing::{debug, instrument};

/// Luminance at or above this value is treated as paper (transparent).
pub const MASK_THRESHOLD: u8 = 128;

/// Binary ink mask: 255 where luminance < [`MASK_THRESHOLD`], 0 elsewhere.
pub fn foreground_mask(foreground: &DynamicImage) -> GrayImage {
    let luma = foreground.to_luma8();
    // `BinaryInverted` maps values above the threshold to 0 and the rest to 255.
    threshold(&luma, MASK_THRESHOLD - 1, ThresholdType::BinaryInverted)
}

/// Black overlay whose alpha channel is the ink mask of `foreground`.
///
/// Output dimensions always equal the foreground's.
#[instrument(skip_all, fields(width = foreground.width(), height = foreground.height()))]
pub fn overlay_layer(foreground: &DynamicImage) -> RgbaImage {
    let mask = foreground_mask(foreground);
    debug!(coverage = ink_coverage(&mask), "Foreground mask built");
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        Rgba([0, 0, 0, mask.get_pixel(x, y).0[0]])
    })
}

/// Fraction of pixels marked as ink.
pub fn ink_coverage(mask: &GrayImage) -> f64 {
    let total = mask.width() as u64 * mask.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let ink = mask.pixels().filter(|p| p.0[0] != 0).count() as u64;
    ink as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn threshold_boundary_is_128() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 127, 128, 255][x as usize]]));
        let mask = foreground_mask(&DynamicImage::ImageLuma8(gray));
        let values: Vec<u8> = mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![255, 255, 0, 0]);
    }

    #[test]
    fn overlay_is_black_with_mask_alpha() {
        let gray = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 10 } else { 240 }]));
        let overlay = overlay_layer(&DynamicImage::ImageLuma8(gray));
        assert_eq!(overlay.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(overlay.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn colour_foreground_uses_luminance() {
        let rgb = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([200, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let mask = foreground_mask(&DynamicImage::ImageRgb8(rgb));
        // Pure-ish red has low luminance and counts as ink.
        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(mask.get_pixel(1, 0).0[0], 0);
    }

    #[test]
    fn overlay_keeps_foreground_dimensions() {
        let overlay = overlay_layer(&DynamicImage::ImageLuma8(GrayImage::new(37, 11)));
        assert_eq!(overlay.dimensions(), (37, 11));
    }

    #[test]
    fn coverage_counts_ink() {
        let mask = GrayImage::from_fn(4, 1, |x, _| Luma([if x < 1 { 255 } else { 0 }]));
        assert_eq!(ink_coverage(&mask), 0.25);
        assert_eq!(ink_coverage(&GrayImage::new(0, 0)), 0.0);
    }
}
