// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the per-page raster work in scanbind-document:
// foreground masking and background resampling on synthetic pages.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use scanbind_core::Resolution;
use scanbind_document::image::overlay_layer;
use scanbind_document::{Raster, Resampler};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Mask a 600x800 foreground with alternating text-like stripes.
fn bench_overlay_layer(c: &mut Criterion) {
    let foreground = GrayImage::from_fn(600, 800, |x, y| {
        if (x / 3 + y / 5) % 4 == 0 { Luma([10u8]) } else { Luma([245u8]) }
    });
    let dynamic = DynamicImage::ImageLuma8(foreground);

    c.bench_function("overlay_layer (600x800)", |b| {
        b.iter(|| black_box(overlay_layer(black_box(&dynamic))));
    });
}

/// Downsample a 600 dpi background to 300 dpi.
fn bench_resample(c: &mut Criterion) {
    let background = RgbImage::from_fn(600, 800, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let raster = Raster::new(DynamicImage::ImageRgb8(background), Resolution::uniform(600.0));
    let resampler = Resampler::new(300);

    c.bench_function("resample 600->300 dpi (600x800)", |b| {
        b.iter(|| black_box(resampler.resample(black_box(raster.clone()))));
    });
}

criterion_group!(benches, bench_overlay_layer, bench_resample);
criterion_main!(benches);
