// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resampler — rescales a raster to a target resolution while keeping its
// physical size.

use image::imageops::FilterType;
use scanbind_core::{PixelSize, Resolution};
use tracing::{debug, instrument};

use super::raster::Raster;

/// Rescales rasters to `target_dpi` with a Lanczos3 filter.
///
/// A target of zero disables resampling; rasters pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    target_dpi: u32,
}

impl Resampler {
    pub fn new(target_dpi: u32) -> Self {
        Self { target_dpi }
    }

    pub fn target_dpi(&self) -> u32 {
        self.target_dpi
    }

    pub fn is_enabled(&self) -> bool {
        self.target_dpi > 0
    }

    /// Pixel dimensions after resampling, `floor(pixels * target / dpi)` per
    /// axis and never below one pixel.
    pub fn target_size(&self, pixel_size: PixelSize, resolution: Resolution) -> PixelSize {
        if !self.is_enabled() || !resolution.is_usable() {
            return pixel_size;
        }
        let target = self.target_dpi as f64;
        let scale = |pixels: u32, dpi: f64| ((pixels as f64 * target / dpi).floor() as u32).max(1);
        PixelSize::new(
            scale(pixel_size.width, resolution.x),
            scale(pixel_size.height, resolution.y),
        )
    }

    /// Rescale `raster` to the target resolution.
    ///
    /// Returns the input untouched when resampling is disabled. When the pixel
    /// dimensions already match, only the recorded resolution changes.
    #[instrument(skip_all, fields(target_dpi = self.target_dpi))]
    pub fn resample(&self, raster: Raster) -> Raster {
        if !self.is_enabled() {
            return raster;
        }

        let current = raster.pixel_size();
        let size = self.target_size(current, raster.resolution);
        let resolution = Resolution::uniform(self.target_dpi as f64);

        if size == current {
            debug!(%current, "Already at target size, no filter pass");
            return Raster::new(raster.image, resolution);
        }

        debug!(
            from = %current,
            to = %size,
            from_dpi = %raster.resolution,
            "Resampling raster"
        );
        let image = raster
            .image
            .resize_exact(size.width, size.height, FilterType::Lanczos3);
        Raster::new(image, resolution)
    }
}
