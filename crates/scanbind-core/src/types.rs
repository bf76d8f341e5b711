// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanbind page pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanbindError};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (unreadable or degenerate asset).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Pixel density in dots per inch, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    /// Assumed when an image carries no resolution tags.
    pub const DEFAULT: Resolution = Resolution { x: 300.0, y: 300.0 };

    /// Reported for assets that could not be read at all.
    pub const UNKNOWN: Resolution = Resolution { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same density on both axes.
    pub fn uniform(dpi: f64) -> Self {
        Self { x: dpi, y: dpi }
    }

    /// Both axes finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }

    /// Return `self` if usable, otherwise [`Resolution::DEFAULT`].
    pub fn or_default(self) -> Self {
        if self.is_usable() { self } else { Self::DEFAULT }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x == self.y {
            write!(f, "{}", self.x)
        } else {
            write!(f, "{}×{}", self.x, self.y)
        }
    }
}

/// Metadata probed from a single image asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub pixel_size: PixelSize,
    pub resolution: Resolution,
    /// False when the resolution was defaulted because the file had no tags.
    pub resolution_tagged: bool,
}

impl ImageInfo {
    /// Placeholder for an asset that could not be opened.
    pub fn unreadable() -> Self {
        Self {
            pixel_size: PixelSize::default(),
            resolution: Resolution::UNKNOWN,
            resolution_tagged: false,
        }
    }

    /// Whether two assets describe the same geometry.
    pub fn same_geometry(&self, other: &ImageInfo) -> bool {
        self.pixel_size == other.pixel_size && self.resolution == other.resolution
    }
}

/// Which half of a mixed page an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerRole {
    Foreground,
    Background,
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreground => f.write_str("foreground"),
            Self::Background => f.write_str("background"),
        }
    }
}

/// Page classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// One source raster.
    Standard,
    /// Background picture raster plus foreground text raster.
    Mixed,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Mixed => f.write_str("mixed"),
        }
    }
}

/// The source assets of a page. A mixed page always carries both halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PageSource {
    Standard {
        image: PathBuf,
    },
    Mixed {
        foreground: PathBuf,
        background: PathBuf,
    },
}

impl PageSource {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Standard { .. } => PageKind::Standard,
            Self::Mixed { .. } => PageKind::Mixed,
        }
    }
}

/// One discovered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// File name within the root output directory; unique and the sort key.
    pub filename: String,
    /// Path of the root output image.
    pub path: PathBuf,
    pub source: PageSource,
    /// Governing pixel size (background for mixed pages).
    pub pixel_size: PixelSize,
    /// Governing resolution (background for mixed pages).
    pub resolution: Resolution,
}

impl PageRecord {
    pub fn kind(&self) -> PageKind {
        self.source.kind()
    }

    /// File name without its extension, used to name per-page artifacts.
    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.filename)
    }
}

/// Physical page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageSize {
    /// `pixels * 72 / dpi` per axis.
    pub fn from_pixels(pixel_size: PixelSize, resolution: Resolution) -> Result<Self> {
        if pixel_size.is_empty() {
            return Err(ScanbindError::InvalidGeometry(format!(
                "image has no pixels ({pixel_size})"
            )));
        }
        if !resolution.is_usable() {
            return Err(ScanbindError::InvalidGeometry(format!(
                "resolution {resolution} dpi cannot be used for page sizing"
            )));
        }
        Ok(Self {
            width_pt: pixel_size.width as f64 * POINTS_PER_INCH / resolution.x,
            height_pt: pixel_size.height as f64 * POINTS_PER_INCH / resolution.y,
        })
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}×{:.2} pt", self.width_pt, self.height_pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_from_200_dpi() {
        let size = PageSize::from_pixels(PixelSize::new(600, 800), Resolution::uniform(200.0))
            .expect("valid geometry");
        assert_eq!(size.width_pt, 216.0);
        assert_eq!(size.height_pt, 288.0);
    }

    #[test]
    fn page_size_uses_each_axis() {
        let size = PageSize::from_pixels(PixelSize::new(300, 300), Resolution::new(300.0, 150.0))
            .expect("valid geometry");
        assert_eq!(size.width_pt, 72.0);
        assert_eq!(size.height_pt, 144.0);
    }

    #[test]
    fn page_size_rejects_zero_dpi() {
        let result = PageSize::from_pixels(PixelSize::new(10, 10), Resolution::UNKNOWN);
        assert!(matches!(result, Err(ScanbindError::InvalidGeometry(_))));
    }

    #[test]
    fn page_size_rejects_empty_image() {
        let result = PageSize::from_pixels(PixelSize::default(), Resolution::DEFAULT);
        assert!(result.is_err());
    }

    #[test]
    fn stem_strips_extension() {
        let record = PageRecord {
            filename: "page0001.tiff".into(),
            path: PathBuf::from("out/page0001.tiff"),
            source: PageSource::Standard {
                image: PathBuf::from("out/page0001.tiff"),
            },
            pixel_size: PixelSize::new(1, 1),
            resolution: Resolution::DEFAULT,
        };
        assert_eq!(record.stem(), "page0001");
        assert_eq!(record.kind(), PageKind::Standard);
    }

    #[test]
    fn unusable_resolution_falls_back() {
        assert_eq!(Resolution::UNKNOWN.or_default(), Resolution::DEFAULT);
        assert_eq!(Resolution::uniform(600.0).or_default(), Resolution::uniform(600.0));
    }
}
