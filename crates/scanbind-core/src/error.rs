// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanbind.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Scanbind operations.
#[derive(Debug, Error)]
pub enum ScanbindError {
    // -- Preconditions --
    #[error("input directory '{}' does not exist; run ScanTailor first", path.display())]
    InputDirMissing { path: PathBuf },

    #[error("no TIFF files found in '{}'", path.display())]
    NoPages { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("required tool '{tool}' was not found on PATH")]
    ToolMissing { tool: String },

    // -- Page assets --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- External tools --
    #[error("compressing page '{page}' failed: {detail}")]
    CompressionFailed { page: String, detail: String },

    #[error("merging page PDFs failed: {0}")]
    MergeFailed(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    // -- Plumbing --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanbindError>;
