// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to a plain English summary with a clear
// suggestion of what to try next.

use crate::error::ScanbindError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operator must do something first (run ScanTailor, install a tool).
    ActionRequired,
    /// An input file or setting is wrong and must be fixed.
    Permanent,
    /// An external program failed; its own output usually explains why.
    ToolFailure,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `ScanbindError` into a `HumanError`.
pub fn humanize_error(err: &ScanbindError) -> HumanError {
    match err {
        ScanbindError::InputDirMissing { path } => HumanError {
            message: format!("There is no ScanTailor output in {}.", path.display()),
            suggestion: "Run ScanTailor on this project first, or pass the project folder with --root.".into(),
            severity: Severity::ActionRequired,
        },

        ScanbindError::NoPages { path } => HumanError {
            message: format!("No page images were found in {}.", path.display()),
            suggestion: "ScanTailor writes .tif files into the 'out' folder; check that the output step has been run.".into(),
            severity: Severity::ActionRequired,
        },

        ScanbindError::InvalidConfig(detail) => HumanError {
            message: "The settings are not valid.".into(),
            suggestion: format!("Fix the option or config file value and try again. ({detail})"),
            severity: Severity::Permanent,
        },

        ScanbindError::ToolMissing { tool } => humanize_missing_tool(tool),

        ScanbindError::ImageError(_) | ScanbindError::InvalidGeometry(_) => HumanError {
            message: "A page image could not be used.".into(),
            suggestion: "The TIFF may be damaged or have no usable resolution. Re-run ScanTailor's output step for that page.".into(),
            severity: Severity::Permanent,
        },

        ScanbindError::PdfError(_) => HumanError {
            message: "A PDF file could not be read or written.".into(),
            suggestion: "Delete the 'pdf' folder and any partial output and run again.".into(),
            severity: Severity::Permanent,
        },

        ScanbindError::CompressionFailed { page, .. } => HumanError {
            message: format!("Ghostscript could not compress page {page}."),
            suggestion: "Check Ghostscript's messages above; try a different --quality preset.".into(),
            severity: Severity::ToolFailure,
        },

        ScanbindError::MergeFailed(_) => HumanError {
            message: "The page PDFs could not be merged.".into(),
            suggestion: "Run again with --keep-pdfs to inspect the single pages, or try --merge native.".into(),
            severity: Severity::ToolFailure,
        },

        ScanbindError::OcrFailed(_) => HumanError {
            message: "Text recognition failed.".into(),
            suggestion: "Make sure the Tesseract language packs for --lang are installed, or use --lang none to skip OCR.".into(),
            severity: Severity::ToolFailure,
        },

        ScanbindError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted while the run was in progress.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission was denied for a file or folder.".into(),
                    suggestion: "Check that the project folder is writable.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Check free disk space; raw page PDFs can be large.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        ScanbindError::Serialization(_) => HumanError {
            message: "The config file could not be parsed.".into(),
            suggestion: "The config file must be JSON, e.g. { \"language\": \"eng\", \"resample-dpi\": 300 }.".into(),
            severity: Severity::Permanent,
        },
    }
}

/// Installation hints for the external programs.
fn humanize_missing_tool(tool: &str) -> HumanError {
    let suggestion = match tool {
        "gs" => "Install Ghostscript (e.g. 'apt install ghostscript' or 'brew install ghostscript').",
        "ocrmypdf" => "Install OCRmyPDF and Tesseract, or use --lang none to skip OCR.",
        _ => "Install it and make sure it is on your PATH.",
    };
    HumanError {
        message: format!("The program '{tool}' is not installed."),
        suggestion: suggestion.into(),
        severity: Severity::ActionRequired,
    }
}
