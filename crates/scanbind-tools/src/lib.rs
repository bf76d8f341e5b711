// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanbind-tools — External programs behind the Scanbind collaborator traits.
//
// Ghostscript compresses and merges page PDFs; OCRmyPDF adds the text layer.
// Each call blocks until the program exits.

pub mod ghostscript;
pub mod ocrmypdf;
pub mod process;

pub use ghostscript::{GhostscriptCompressor, GhostscriptMerger, GHOSTSCRIPT};
pub use ocrmypdf::{OcrMyPdf, OCRMYPDF};
pub use process::{is_on_path, preflight, require};
