// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanbind — bind ScanTailor output into one searchable PDF.
//
// Entry point. Parses arguments, initialises logging, builds the run
// configuration, lists the discovered pages, and drives the pipeline with the
// Ghostscript and OCRmyPDF collaborators.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use scanbind_core::{BindConfig, InputLayout, MergeBackend, OcrLanguage, PageMerger, QualityPreset};
use scanbind_document::{Collaborators, DocumentPipeline, NativeMerger, PipelineOutcome};
use scanbind_tools::{GhostscriptCompressor, GhostscriptMerger, OcrMyPdf};

#[derive(Parser, Debug)]
#[command(name = "scanbind", version, about)]
struct Cli {
    /// ScanTailor project directory (the one containing `out/`).
    #[arg(long, default_value = ".", env = "SCANBIND_ROOT")]
    root: PathBuf,

    /// OCR language selector, e.g. `deu`, `eng+deu`, or `none` to skip OCR.
    #[arg(short, long)]
    lang: Option<String>,

    /// Target DPI for mixed-page backgrounds; 0 keeps the source resolution.
    #[arg(long)]
    dpi: Option<u32>,

    /// Ghostscript quality preset: screen, ebook, printer, or prepress.
    #[arg(short, long)]
    quality: Option<QualityPreset>,

    /// PDF compatibility level for the compressed pages.
    #[arg(long = "compat")]
    compatibility_level: Option<String>,

    /// How to merge the page PDFs: ghostscript or native.
    #[arg(long)]
    merge: Option<MergeBackend>,

    /// Keep the per-page PDFs in `<root>/pdf`.
    #[arg(long)]
    keep_pdfs: bool,

    /// List the discovered pages and stop.
    #[arg(long)]
    list_only: bool,

    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the page listing as JSON.
    #[arg(long)]
    json: bool,

    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,

    /// Debug-level logging (unless RUST_LOG is set).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    report::configure_color(cli.no_color);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::print_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the config file, then explicit flags.
fn build_config(cli: &Cli) -> anyhow::Result<BindConfig> {
    let mut config = match &cli.config {
        Some(path) => BindConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => BindConfig::default(),
    };

    if let Some(lang) = &cli.lang {
        config.language = OcrLanguage::new(lang.as_str());
    }
    if let Some(dpi) = cli.dpi {
        config.resample_dpi = dpi;
    }
    if let Some(quality) = cli.quality {
        config.quality = quality;
    }
    if let Some(level) = &cli.compatibility_level {
        config.compatibility_level = level.clone();
    }
    if let Some(merge) = cli.merge {
        config.merge_backend = merge;
    }
    config.retain_page_artifacts |= cli.keep_pdfs;
    config.discover_only |= cli.list_only;

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = build_config(cli)?;
    let layout = InputLayout::from_root(&cli.root);
    tracing::info!(root = %layout.root.display(), "Scanbind starting");

    let compressor = GhostscriptCompressor::from_config(&config);
    let gs_merger = GhostscriptMerger::new();
    let native_merger = NativeMerger::new();
    let merger: &dyn PageMerger = match config.merge_backend {
        MergeBackend::Ghostscript => &gs_merger,
        MergeBackend::Native => &native_merger,
    };
    let ocr = OcrMyPdf::new();
    let tools = Collaborators {
        compressor: &compressor,
        merger,
        ocr: &ocr,
    };
    let mut pipeline = DocumentPipeline::new(&config, &layout, tools);

    let listing = pipeline.discover()?;
    if cli.json {
        report::print_json(&listing)?;
    } else {
        report::print_listing(&listing);
    }
    if !config.discover_only {
        scanbind_tools::preflight(&config)?;
    }

    let outcome = pipeline
        .run_with_report(listing)
        .with_context(|| format!("bind '{}'", layout.root.display()))?;
    if let PipelineOutcome::Completed(summary) = outcome {
        report::print_summary(&summary);
    }
    Ok(())
}
