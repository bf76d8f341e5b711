// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanbind-document — Page processing for Scanbind.
//
// Discovers ScanTailor output pages, resamples and masks their rasters,
// assembles single-page PDFs, merges them, and drives the whole run through
// `DocumentPipeline`.

pub mod image;
pub mod pdf;
pub mod pipeline;
pub mod scan;

// Re-export the primary structs so callers can use `scanbind_document::PageDiscovery` etc.
pub use image::{Raster, Resampler};
pub use pdf::{NativeMerger, PageAssembler, PdfInspector};
pub use pipeline::{Collaborators, DocumentPipeline, PipelineOutcome, PipelineStage, RunSummary};
pub use scan::{DiscoveryReport, DiscoveryWarning, PageDiscovery};
