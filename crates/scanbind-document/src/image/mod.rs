// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — raster loading, resampling, and foreground masking.

pub mod mask;
pub mod raster;
pub mod resample;

pub use mask::{foreground_mask, overlay_layer, MASK_THRESHOLD};
pub use raster::{probe, Raster};
pub use resample::Resampler;
