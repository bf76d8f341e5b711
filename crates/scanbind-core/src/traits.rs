// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits for the steps Scanbind delegates to other programs.
//
// Each step is a synchronous, fallible call. Implementations backed by
// external processes live in `scanbind-tools`; the in-process merger lives in
// `scanbind-document`.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Normalise and compress a single-page PDF.
pub trait PageCompressor {
    /// Read the raw page at `input` and write the compressed page to `output`.
    ///
    /// Failures are reported as `ScanbindError::CompressionFailed`.
    fn compress(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Concatenate page PDFs into one document.
pub trait PageMerger {
    /// Write the pages of `inputs`, in the given order, to `output`.
    ///
    /// Failures are reported as `ScanbindError::MergeFailed`.
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

/// Add a searchable text layer to a PDF.
pub trait OcrProcessor {
    /// Recognise text in `input` using `language` (e.g. `eng+deu`) and write
    /// the result to `output`, keeping page count and order.
    ///
    /// Failures are reported as `ScanbindError::OcrFailed`.
    fn ocr(&self, input: &Path, output: &Path, language: &str) -> Result<()>;
}
