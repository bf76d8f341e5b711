// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCRmyPDF as the text-layer step.

use std::ffi::OsString;
use std::path::Path;

use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::OcrProcessor;
use tracing::{info, instrument};

use crate::process::run;

/// OCRmyPDF executable name.
pub const OCRMYPDF: &str = "ocrmypdf";

/// Adds a Tesseract text layer, auto-rotating pages, without re-optimising
/// the already compressed images.
#[derive(Debug, Clone)]
pub struct OcrMyPdf {
    program: String,
}

impl Default for OcrMyPdf {
    fn default() -> Self {
        Self {
            program: OCRMYPDF.to_string(),
        }
    }
}

impl OcrMyPdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args(&self, input: &Path, output: &Path, language: &str) -> Vec<OsString> {
        vec![
            "--quiet".into(),
            "--output-type".into(),
            "pdf".into(),
            // Threshold in MB above which linearisation is skipped.
            "--fast-web-view".into(),
            "999999".into(),
            "--language".into(),
            language.into(),
            "--redo-ocr".into(),
            "--optimize".into(),
            "0".into(),
            "--rotate-pages".into(),
            "--rotate-pages-threshold".into(),
            "2".into(),
            input.into(),
            output.into(),
        ]
    }
}

impl OcrProcessor for OcrMyPdf {
    #[instrument(skip_all, fields(%language, output = %output.display()))]
    fn ocr(&self, input: &Path, output: &Path, language: &str) -> Result<()> {
        info!("Recognising text with OCRmyPDF");
        run(
            &self.program,
            &self.args(input, output, language),
            ScanbindError::OcrFailed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_carry_language_and_paths() {
        let args: Vec<String> = OcrMyPdf::new()
            .args(Path::new("out-combined.pdf"), Path::new("out.pdf"), "eng+deu")
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--quiet",
                "--output-type",
                "pdf",
                "--fast-web-view",
                "999999",
                "--language",
                "eng+deu",
                "--redo-ocr",
                "--optimize",
                "0",
                "--rotate-pages",
                "--rotate-pages-threshold",
                "2",
                "out-combined.pdf",
                "out.pdf",
            ]
        );
    }

    #[test]
    fn missing_ocrmypdf_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ocr = OcrMyPdf::new().with_program("scanbind-no-such-ocrmypdf");
        let result = ocr.ocr(&dir.path().join("in.pdf"), &dir.path().join("out.pdf"), "eng");
        assert!(matches!(result, Err(ScanbindError::ToolMissing { .. })));
    }
}
