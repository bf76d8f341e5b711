// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document pipeline — discovery, per-page assembly and compression, merge,
// OCR, and cleanup, run strictly in that order.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::{
    BindConfig, InputLayout, OcrProcessor, PageCompressor, PageMerger, PageRecord, PageSize,
    PageSource,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::image::{overlay_layer, Raster, Resampler};
use crate::pdf::{CompositeLayer, PageAssembler, PageComposition};
use crate::scan::{DiscoveryReport, PageDiscovery};

/// Pipeline stages. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Discovering,
    PerPageProcessing,
    Merging,
    PostProcessing,
    Finalizing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovering => "discovering",
            Self::PerPageProcessing => "per-page processing",
            Self::Merging => "merging",
            Self::PostProcessing => "post-processing",
            Self::Finalizing => "finalizing",
        };
        f.write_str(name)
    }
}

/// The external steps the pipeline delegates.
pub struct Collaborators<'a> {
    pub compressor: &'a dyn PageCompressor,
    pub merger: &'a dyn PageMerger,
    pub ocr: &'a dyn OcrProcessor,
}

/// Counts and location of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub standard_pages: usize,
    pub mixed_pages: usize,
    pub final_document: PathBuf,
    pub ocr_applied: bool,
}

impl RunSummary {
    pub fn total_pages(&self) -> usize {
        self.standard_pages + self.mixed_pages
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Stopped after discovery because only a listing was requested.
    Discovered(DiscoveryReport),
    Completed(RunSummary),
}

/// Turns a ScanTailor project into one PDF.
pub struct DocumentPipeline<'a> {
    config: &'a BindConfig,
    layout: &'a InputLayout,
    tools: Collaborators<'a>,
    resampler: Resampler,
    assembler: PageAssembler,
    stage: Option<PipelineStage>,
}

impl<'a> DocumentPipeline<'a> {
    pub fn new(config: &'a BindConfig, layout: &'a InputLayout, tools: Collaborators<'a>) -> Self {
        Self {
            config,
            layout,
            tools,
            resampler: Resampler::new(config.resample_dpi),
            assembler: PageAssembler::new(),
            stage: None,
        }
    }

    /// The stage most recently entered, if the run has started.
    pub fn stage(&self) -> Option<PipelineStage> {
        self.stage
    }

    /// Run every stage. The first failure ends the run.
    pub fn run(&mut self) -> Result<PipelineOutcome> {
        let report = self.discover()?;
        self.run_with_report(report)
    }

    /// Find the pages to bind. An empty project is an error.
    #[instrument(skip_all, fields(root = %self.layout.root.display()))]
    pub fn discover(&mut self) -> Result<DiscoveryReport> {
        self.enter(PipelineStage::Discovering);
        let report = PageDiscovery::new(self.layout).discover()?;
        if report.is_empty() {
            return Err(ScanbindError::NoPages {
                path: self.layout.out_dir.clone(),
            });
        }
        Ok(report)
    }

    /// Run the remaining stages over an already discovered `report`.
    ///
    /// Only the pages in `report` are bound; the input directories are not
    /// listed again.
    #[instrument(skip_all, fields(root = %self.layout.root.display(), pages = report.pages.len()))]
    pub fn run_with_report(&mut self, report: DiscoveryReport) -> Result<PipelineOutcome> {
        let config = self.config;
        let layout = self.layout;

        if report.is_empty() {
            return Err(ScanbindError::NoPages {
                path: layout.out_dir.clone(),
            });
        }
        if config.discover_only {
            info!(pages = report.pages.len(), "Listing only, stopping after discovery");
            return Ok(PipelineOutcome::Discovered(report));
        }

        self.enter(PipelineStage::PerPageProcessing);
        let page_pdfs = self.process_pages(&report.pages)?;
        let standard_pages = report.standard_count();
        let mixed_pages = report.mixed_count();
        info!(
            standard = standard_pages,
            mixed = mixed_pages,
            total = page_pdfs.len(),
            "All pages processed"
        );

        self.enter(PipelineStage::Merging);
        self.tools.merger.merge(&page_pdfs, &layout.combined_pdf)?;

        self.enter(PipelineStage::PostProcessing);
        let ocr_applied = config.ocr_enabled();
        if ocr_applied {
            let language = config.language.as_str();
            info!(%language, "Running OCR");
            self.tools
                .ocr
                .ocr(&layout.combined_pdf, &layout.final_pdf, language)?;
            fs::remove_file(&layout.combined_pdf)?;
        } else {
            info!("OCR disabled, using merged document as is");
            if layout.final_pdf.exists() {
                fs::remove_file(&layout.final_pdf)?;
            }
            fs::rename(&layout.combined_pdf, &layout.final_pdf)?;
        }

        self.enter(PipelineStage::Finalizing);
        if config.retain_page_artifacts {
            debug!(dir = %layout.pdf_dir.display(), "Keeping page PDFs");
        } else {
            fs::remove_dir_all(&layout.pdf_dir)?;
        }

        info!(output = %layout.final_pdf.display(), "Document complete");
        Ok(PipelineOutcome::Completed(RunSummary {
            standard_pages,
            mixed_pages,
            final_document: layout.final_pdf.clone(),
            ocr_applied,
        }))
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug_assert!(self.stage.is_none_or(|current| current < stage));
        info!(%stage, "Entering stage");
        self.stage = Some(stage);
    }

    /// Assemble and compress every page, returning the page PDFs in order.
    fn process_pages(&self, pages: &[PageRecord]) -> Result<Vec<PathBuf>> {
        let pdf_dir = &self.layout.pdf_dir;
        if pdf_dir.exists() {
            fs::remove_dir_all(pdf_dir)?;
        }
        fs::create_dir_all(pdf_dir)?;

        let total = pages.len();
        let mut outputs = Vec::with_capacity(total);
        for (index, page) in pages.iter().enumerate() {
            info!(
                page = %page.filename,
                kind = %page.kind(),
                number = index + 1,
                total,
                "Processing page"
            );
            outputs.push(self.process_page(page)?);
        }
        Ok(outputs)
    }

    fn process_page(&self, page: &PageRecord) -> Result<PathBuf> {
        let composition = compose_page(page, &self.resampler)?;

        let raw = tempfile::Builder::new()
            .prefix(&format!("{}-", page.stem()))
            .suffix(".pdf")
            .tempfile()?;
        self.assembler.write_to_file(composition, raw.path())?;

        let output = self.layout.page_pdf(page.stem());
        let compressed = self.tools.compressor.compress(raw.path(), &output);
        if let Err(err) = raw.close() {
            warn!(page = %page.filename, %err, "Could not remove temporary page PDF");
        }
        compressed?;

        debug!(output = %output.display(), "Page compressed");
        Ok(output)
    }
}

/// Build the layers for one page.
///
/// Standard pages are embedded at their native resolution and colour mode.
/// Mixed pages get a resampled RGB background and a masked foreground overlay;
/// the page size follows the resampled background.
#[instrument(skip_all, fields(page = %page.filename, kind = %page.kind()))]
pub fn compose_page(page: &PageRecord, resampler: &Resampler) -> Result<PageComposition> {
    match &page.source {
        PageSource::Standard { image } => {
            let raster = Raster::open(image)?;
            let size = PageSize::from_pixels(raster.pixel_size(), raster.resolution)?;
            debug!(%size, pixels = %raster.pixel_size(), dpi = %raster.resolution, "Standard page");
            Ok(PageComposition::single(
                size,
                CompositeLayer::from_dynamic(raster.image),
            ))
        }
        PageSource::Mixed {
            foreground,
            background,
        } => {
            let background = resampler.resample(Raster::open(background)?);
            let size = PageSize::from_pixels(background.pixel_size(), background.resolution)?;
            let overlay = overlay_layer(&Raster::open(foreground)?.image);
            debug!(
                %size,
                background = %background.pixel_size(),
                foreground_width = overlay.width(),
                foreground_height = overlay.height(),
                "Mixed page"
            );
            Ok(PageComposition::layered(
                size,
                CompositeLayer::Rgb(background.image.into_rgb8()),
                CompositeLayer::Rgba(overlay),
            ))
        }
    }
}
