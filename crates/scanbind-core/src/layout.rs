// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem layout of a ScanTailor project directory.
//
// <root>/out ................. output TIFFs, one per page
// <root>/out/foreground ...... B/W text TIFFs (mixed pages only)
// <root>/out/background ...... colour/grayscale picture TIFFs (mixed pages only)
// <root>/pdf ................. per-page PDFs written by the pipeline
// <root>/out-combined.pdf .... merged document before OCR
// <root>/out.pdf ............. final document

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Resolved input and output paths for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLayout {
    pub root: PathBuf,
    pub out_dir: PathBuf,
    pub foreground_dir: PathBuf,
    pub background_dir: PathBuf,
    pub pdf_dir: PathBuf,
    pub combined_pdf: PathBuf,
    pub final_pdf: PathBuf,
}

impl InputLayout {
    /// Derive the conventional layout below `root`.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let out_dir = root.join("out");
        Self {
            foreground_dir: out_dir.join("foreground"),
            background_dir: out_dir.join("background"),
            pdf_dir: root.join("pdf"),
            combined_pdf: root.join("out-combined.pdf"),
            final_pdf: root.join("out.pdf"),
            out_dir,
            root,
        }
    }

    /// Where the compressed PDF for the page with this stem is written.
    pub fn page_pdf(&self, stem: &str) -> PathBuf {
        self.pdf_dir.join(format!("{stem}.pdf"))
    }
}
