// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster loading and metadata probing.
//
// The `image` crate decodes pixels but drops resolution tags, so resolution
// is read separately from the TIFF directory with the `tiff` crate. Images
// without usable tags are assigned 300 dpi here, at the loading boundary;
// every consumer downstream sees a resolved `Resolution`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;
use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::{ImageInfo, PixelSize, Resolution};
use tiff::decoder::ifd::Value;
use tiff::decoder::Decoder;
use tiff::tags::Tag;
use tracing::{debug, instrument, warn};

/// Centimetres per inch, for `ResolutionUnit = 3`.
const CM_PER_INCH: f64 = 2.54;

/// A decoded image together with its resolution.
#[derive(Debug, Clone)]
pub struct Raster {
    pub image: DynamicImage,
    pub resolution: Resolution,
}

impl Raster {
    pub fn new(image: DynamicImage, resolution: Resolution) -> Self {
        Self { image, resolution }
    }

    /// Decode an image file and resolve its resolution.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = decode(path)?;
        let resolution = match read_tiff_resolution(path) {
            Some(resolution) => resolution,
            None => {
                debug!("No resolution tags, assuming {} dpi", Resolution::DEFAULT);
                Resolution::DEFAULT
            }
        };
        debug!(
            width = image.width(),
            height = image.height(),
            %resolution,
            "Raster loaded"
        );
        Ok(Self { image, resolution })
    }

    pub fn pixel_size(&self) -> PixelSize {
        PixelSize::new(self.image.width(), self.image.height())
    }
}

/// Read pixel size and resolution without decoding pixel data.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn probe(path: impl AsRef<Path>) -> Result<ImageInfo> {
    let path = path.as_ref();
    let (width, height) = image::image_dimensions(path).map_err(|err| {
        ScanbindError::ImageError(format!("failed to read {}: {}", path.display(), err))
    })?;
    let tagged = read_tiff_resolution(path);
    Ok(ImageInfo {
        pixel_size: PixelSize::new(width, height),
        resolution: tagged.unwrap_or(Resolution::DEFAULT),
        resolution_tagged: tagged.is_some(),
    })
}

/// Decode pixels with the `image` crate. Its TIFF decoder covers the 1-bit
/// bilevel and CCITT G4 foregrounds ScanTailor writes.
fn decode(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|err| {
        ScanbindError::ImageError(format!("failed to open {}: {}", path.display(), err))
    })
}

/// Read `XResolution`/`YResolution` in dots per inch.
///
/// Returns `None` for non-TIFF files, missing tags, zero values, or a
/// resolution without an absolute unit.
fn read_tiff_resolution(path: &Path) -> Option<Resolution> {
    let file = File::open(path).ok()?;
    let mut decoder = match Decoder::new(BufReader::new(file)) {
        Ok(decoder) => decoder,
        Err(err) => {
            debug!(%err, "Not a readable TIFF, no resolution tags");
            return None;
        }
    };

    let x = decoder
        .find_tag(Tag::XResolution)
        .ok()
        .flatten()
        .and_then(|v| value_as_f64(&v))?;
    let y = decoder
        .find_tag(Tag::YResolution)
        .ok()
        .flatten()
        .and_then(|v| value_as_f64(&v))
        .unwrap_or(x);

    // TIFF default unit is inch (2).
    let unit = decoder
        .find_tag(Tag::ResolutionUnit)
        .ok()
        .flatten()
        .and_then(|v| value_as_f64(&v))
        .unwrap_or(2.0);

    let resolution = match unit as u32 {
        // Unit "none" only records an aspect ratio.
        1 => {
            debug!(path = %path.display(), "Resolution has no absolute unit");
            return None;
        }
        3 => Resolution::new(x * CM_PER_INCH, y * CM_PER_INCH),
        2 => Resolution::new(x, y),
        other => {
            warn!(path = %path.display(), unit = other, "Unknown resolution unit, assuming inches");
            Resolution::new(x, y)
        }
    };

    resolution.is_usable().then_some(resolution)
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Byte(v) => Some(*v as f64),
        Value::Short(v) => Some(*v as f64),
        Value::Unsigned(v) => Some(*v as f64),
        Value::Float(v) => Some(*v as f64),
        Value::Double(v) => Some(*v),
        Value::Rational(n, d) if *d != 0 => Some(*n as f64 / *d as f64),
        Value::List(values) => values.first().and_then(value_as_f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_values_convert() {
        assert_eq!(value_as_f64(&Value::Rational(600, 2)), Some(300.0));
        assert_eq!(value_as_f64(&Value::Rational(1, 0)), None);
        assert_eq!(value_as_f64(&Value::Short(3)), Some(3.0));
    }

    #[test]
    fn probe_missing_file_is_error() {
        let result = probe("/nonexistent/page.tif");
        assert!(matches!(result, Err(ScanbindError::ImageError(_))));
    }
}
