// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the integration tests: TIFF writers and in-process
// collaborator fakes.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::{InputLayout, OcrProcessor, PageCompressor, PageMerger};
use scanbind_document::NativeMerger;
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::ResolutionUnit;

/// A project directory with the `out/`, `out/foreground/`, and
/// `out/background/` folders created.
pub struct Project {
    pub dir: tempfile::TempDir,
    pub layout: InputLayout,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = InputLayout::from_root(dir.path());
        fs::create_dir_all(&layout.foreground_dir).expect("mkdir foreground");
        fs::create_dir_all(&layout.background_dir).expect("mkdir background");
        Self { dir, layout }
    }

    pub fn page(&self, name: &str) -> PathBuf {
        self.layout.out_dir.join(name)
    }

    pub fn foreground(&self, name: &str) -> PathBuf {
        self.layout.foreground_dir.join(name)
    }

    pub fn background(&self, name: &str) -> PathBuf {
        self.layout.background_dir.join(name)
    }

    /// Standard gray page at `dpi`.
    pub fn add_standard(&self, name: &str, width: u32, height: u32, dpi: u32) {
        write_gray_tiff(&self.page(name), width, height, Some(dpi), |_, _| 200);
    }

    /// Mixed page: root image, text foreground, and colour background, all
    /// with the same geometry.
    pub fn add_mixed(&self, name: &str, width: u32, height: u32, dpi: u32) {
        write_rgb_tiff(&self.page(name), width, height, Some(dpi), [180, 160, 140]);
        write_gray_tiff(&self.foreground(name), width, height, Some(dpi), |x, _| {
            if x % 2 == 0 { 0 } else { 255 }
        });
        write_rgb_tiff(&self.background(name), width, height, Some(dpi), [20, 120, 220]);
    }
}

pub fn write_gray_tiff(
    path: &Path,
    width: u32,
    height: u32,
    dpi: Option<u32>,
    pixel: impl Fn(u32, u32) -> u8,
) {
    let data: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| pixel(x, y))
        .collect();
    let file = File::create(path).expect("create tiff");
    let mut encoder = TiffEncoder::new(file).expect("tiff encoder");
    let mut image = encoder
        .new_image::<colortype::Gray8>(width, height)
        .expect("gray image");
    if let Some(dpi) = dpi {
        image.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    }
    image.write_data(&data).expect("write gray tiff");
}

pub fn write_rgb_tiff(path: &Path, width: u32, height: u32, dpi: Option<u32>, rgb: [u8; 3]) {
    let data: Vec<u8> = rgb
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 3)
        .collect();
    let file = File::create(path).expect("create tiff");
    let mut encoder = TiffEncoder::new(file).expect("tiff encoder");
    let mut image = encoder
        .new_image::<colortype::RGB8>(width, height)
        .expect("rgb image");
    if let Some(dpi) = dpi {
        image.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    }
    image.write_data(&data).expect("write rgb tiff");
}

/// Write an uncompressed 1-bit WhiteIsZero TIFF, the format ScanTailor uses
/// for foreground layers. `rows` holds each row packed MSB-first and padded
/// to whole bytes; a set bit is black.
pub fn write_bilevel_tiff(path: &Path, width: u32, rows: &[Vec<u8>], dpi: u32) {
    const SHORT: u16 = 3;
    const LONG: u16 = 4;
    const RATIONAL: u16 = 5;
    const ENTRIES: u32 = 12;

    let height = rows.len() as u32;
    let data: Vec<u8> = rows.concat();
    let ifd_offset = 8u32;
    let x_res_offset = ifd_offset + 2 + ENTRIES * 12 + 4;
    let y_res_offset = x_res_offset + 8;
    let data_offset = y_res_offset + 8;

    let mut bytes = b"II*\0".to_vec();
    bytes.extend_from_slice(&ifd_offset.to_le_bytes());
    bytes.extend_from_slice(&(ENTRIES as u16).to_le_bytes());
    let mut entry = |tag: u16, kind: u16, value: u32| {
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&kind.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        if kind == SHORT {
            bytes.extend_from_slice(&(value as u16).to_le_bytes());
            bytes.extend_from_slice(&[0, 0]);
        } else {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    };
    entry(256, SHORT, width); // ImageWidth
    entry(257, SHORT, height); // ImageLength
    entry(258, SHORT, 1); // BitsPerSample
    entry(259, SHORT, 1); // Compression: none
    entry(262, SHORT, 0); // Photometric: WhiteIsZero
    entry(273, LONG, data_offset); // StripOffsets
    entry(277, SHORT, 1); // SamplesPerPixel
    entry(278, SHORT, height); // RowsPerStrip
    entry(279, LONG, data.len() as u32); // StripByteCounts
    entry(282, RATIONAL, x_res_offset); // XResolution
    entry(283, RATIONAL, y_res_offset); // YResolution
    entry(296, SHORT, 2); // ResolutionUnit: inch
    bytes.extend_from_slice(&0u32.to_le_bytes());
    for _ in 0..2 {
        bytes.extend_from_slice(&dpi.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
    }
    bytes.extend_from_slice(&data);
    fs::write(path, bytes).expect("write bilevel tiff");
}

/// Stands in for Ghostscript: copies the raw page unchanged.
#[derive(Default)]
pub struct CopyCompressor {
    pub inputs: RefCell<Vec<PathBuf>>,
}

impl PageCompressor for CopyCompressor {
    fn compress(&self, input: &Path, output: &Path) -> Result<()> {
        assert!(input.exists(), "raw page must exist while compressing");
        self.inputs.borrow_mut().push(input.to_path_buf());
        fs::copy(input, output)?;
        Ok(())
    }
}

/// Fails every page.
#[derive(Default)]
pub struct FailingCompressor {
    pub inputs: RefCell<Vec<PathBuf>>,
}

impl PageCompressor for FailingCompressor {
    fn compress(&self, input: &Path, _output: &Path) -> Result<()> {
        self.inputs.borrow_mut().push(input.to_path_buf());
        Err(ScanbindError::CompressionFailed {
            page: input.display().to_string(),
            detail: "gs exited with status 1".into(),
        })
    }
}

/// Merges with [`NativeMerger`] and keeps a copy of the merged bytes.
#[derive(Default)]
pub struct RecordingMerger {
    pub merged: RefCell<Option<Vec<u8>>>,
    pub inputs: RefCell<Vec<PathBuf>>,
}

impl PageMerger for RecordingMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        self.inputs.borrow_mut().extend_from_slice(inputs);
        NativeMerger::new().merge(inputs, output)?;
        *self.merged.borrow_mut() = Some(fs::read(output)?);
        Ok(())
    }
}

/// Stands in for ocrmypdf: copies input to output and records the language.
#[derive(Default)]
pub struct RecordingOcr {
    pub languages: RefCell<Vec<String>>,
}

impl OcrProcessor for RecordingOcr {
    fn ocr(&self, input: &Path, output: &Path, language: &str) -> Result<()> {
        self.languages.borrow_mut().push(language.to_string());
        fs::copy(input, output)?;
        Ok(())
    }
}

/// Fails the merge without writing anything.
#[derive(Default)]
pub struct FailingMerger {
    pub calls: RefCell<usize>,
}

impl PageMerger for FailingMerger {
    fn merge(&self, _inputs: &[PathBuf], _output: &Path) -> Result<()> {
        *self.calls.borrow_mut() += 1;
        Err(ScanbindError::MergeFailed("gs exited with status 1".into()))
    }
}

/// Fails text recognition without writing the output.
#[derive(Default)]
pub struct FailingOcr {
    pub calls: RefCell<usize>,
}

impl OcrProcessor for FailingOcr {
    fn ocr(&self, _input: &Path, _output: &Path, _language: &str) -> Result<()> {
        *self.calls.borrow_mut() += 1;
        Err(ScanbindError::OcrFailed("tesseract language 'xx' not installed".into()))
    }
}
