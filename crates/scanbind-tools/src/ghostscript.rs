// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ghostscript `pdfwrite` as page compressor and page merger.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::{BindConfig, PageCompressor, PageMerger, QualityPreset};
use tracing::{info, instrument};

use crate::process::run;

/// Ghostscript executable name.
pub const GHOSTSCRIPT: &str = "gs";

fn output_file(path: &Path) -> OsString {
    let mut arg = OsString::from("-sOutputFile=");
    arg.push(path);
    arg
}

/// Rewrites each raw page through `pdfwrite` with a quality preset.
#[derive(Debug, Clone)]
pub struct GhostscriptCompressor {
    program: String,
    quality: QualityPreset,
    compatibility_level: String,
}

impl GhostscriptCompressor {
    pub fn new(quality: QualityPreset, compatibility_level: impl Into<String>) -> Self {
        Self {
            program: GHOSTSCRIPT.to_string(),
            quality,
            compatibility_level: compatibility_level.into(),
        }
    }

    pub fn from_config(config: &BindConfig) -> Self {
        Self::new(config.quality, config.compatibility_level.clone())
    }

    /// Use a different executable, e.g. `gswin64c`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-sDEVICE=pdfwrite".into(),
            format!("-dCompatibilityLevel={}", self.compatibility_level).into(),
            format!("-dPDFSETTINGS={}", self.quality.pdf_settings()).into(),
            "-dNOPAUSE".into(),
            "-dQUIET".into(),
            "-dBATCH".into(),
            output_file(output),
            input.into(),
        ]
    }
}

impl PageCompressor for GhostscriptCompressor {
    #[instrument(skip_all, fields(output = %output.display()))]
    fn compress(&self, input: &Path, output: &Path) -> Result<()> {
        let page = output
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| output.display().to_string());
        run(&self.program, &self.args(input, output), |detail| {
            ScanbindError::CompressionFailed { page, detail }
        })
    }
}

/// Concatenates page PDFs with `pdfwrite`.
#[derive(Debug, Clone)]
pub struct GhostscriptMerger {
    program: String,
}

impl Default for GhostscriptMerger {
    fn default() -> Self {
        Self {
            program: GHOSTSCRIPT.to_string(),
        }
    }
}

impl GhostscriptMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args(&self, inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-dBATCH".into(),
            "-dNOPAUSE".into(),
            "-q".into(),
            "-sDEVICE=pdfwrite".into(),
            output_file(output),
        ];
        args.extend(inputs.iter().map(OsString::from));
        args
    }
}

impl PageMerger for GhostscriptMerger {
    #[instrument(skip_all, fields(inputs = inputs.len(), output = %output.display()))]
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        if inputs.is_empty() {
            return Err(ScanbindError::MergeFailed("no page PDFs to merge".into()));
        }
        info!("Merging page PDFs with Ghostscript");
        run(&self.program, &self.args(inputs, output), ScanbindError::MergeFailed)
    }
}
