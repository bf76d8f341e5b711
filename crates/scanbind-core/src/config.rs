// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration, constructed once and passed into every component.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanbindError};

/// Ghostscript `-dPDFSETTINGS` presets trading file size against fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityPreset {
    /// 72 dpi images, smallest files.
    Screen,
    /// 150 dpi images.
    Ebook,
    /// 300 dpi images.
    #[default]
    Printer,
    /// 300 dpi images, colour preserving.
    Prepress,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 4] = [Self::Screen, Self::Ebook, Self::Printer, Self::Prepress];

    /// Keyword without the leading slash.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Ebook => "ebook",
            Self::Printer => "printer",
            Self::Prepress => "prepress",
        }
    }

    /// Value passed as `-dPDFSETTINGS=`.
    pub fn pdf_settings(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = ScanbindError;

    /// Accepts both `printer` and the Ghostscript spelling `/printer`.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().trim_start_matches('/').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == key)
            .ok_or_else(|| {
                ScanbindError::InvalidConfig(format!(
                    "unknown quality preset '{s}' (expected screen, ebook, printer or prepress)"
                ))
            })
    }
}

/// How per-page PDFs are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeBackend {
    /// Ghostscript `pdfwrite`, which also normalises the merged document.
    #[default]
    Ghostscript,
    /// In-process page concatenation with `lopdf`.
    Native,
}

impl fmt::Display for MergeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ghostscript => f.write_str("ghostscript"),
            Self::Native => f.write_str("native"),
        }
    }
}

impl FromStr for MergeBackend {
    type Err = ScanbindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ghostscript" | "gs" => Ok(Self::Ghostscript),
            "native" | "lopdf" => Ok(Self::Native),
            other => Err(ScanbindError::InvalidConfig(format!(
                "unknown merge backend '{other}' (expected ghostscript or native)"
            ))),
        }
    }
}

/// OCR language selector, e.g. `deu`, `eng+deu`, or `none` to skip OCR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrLanguage(String);

impl OcrLanguage {
    /// Sentinel that disables OCR.
    pub const NONE: &'static str = "none";

    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn none() -> Self {
        Self(Self::NONE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the `none` sentinel (case-insensitive).
    pub fn is_none(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(Self::NONE)
    }

    /// Individual language codes of a `+`-joined selector.
    pub fn codes(&self) -> Vec<&str> {
        if self.is_none() {
            return Vec::new();
        }
        self.0.split('+').map(str::trim).collect()
    }

    /// Every `+`-separated code must be a non-empty run of `[A-Za-z0-9_]`.
    pub fn validate(&self) -> Result<()> {
        if self.is_none() {
            return Ok(());
        }
        let valid = self.codes().iter().all(|code| {
            !code.is_empty()
                && code
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
        if valid {
            Ok(())
        } else {
            Err(ScanbindError::InvalidConfig(format!(
                "invalid OCR language selector '{}' (use codes like 'eng', 'eng+deu' or 'none')",
                self.0
            )))
        }
    }
}

impl Default for OcrLanguage {
    fn default() -> Self {
        Self("deu".to_string())
    }
}

impl fmt::Display for OcrLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// PDF compatibility levels Ghostscript's `pdfwrite` accepts.
const COMPATIBILITY_LEVELS: [&str; 6] = ["1.3", "1.4", "1.5", "1.6", "1.7", "2.0"];

/// Settings for one binding run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BindConfig {
    /// OCR language selector, or `none`.
    pub language: OcrLanguage,
    /// Target DPI for mixed-page backgrounds; 0 keeps the source resolution.
    pub resample_dpi: u32,
    /// Ghostscript quality preset for the per-page PDFs.
    pub quality: QualityPreset,
    /// Keep the per-page PDFs after merging.
    pub retain_page_artifacts: bool,
    /// Stop after discovery and reporting.
    pub discover_only: bool,
    /// Backend used to concatenate the page PDFs.
    pub merge_backend: MergeBackend,
    /// `-dCompatibilityLevel` for page compression.
    pub compatibility_level: String,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            language: OcrLanguage::default(),
            resample_dpi: 300,
            quality: QualityPreset::Printer,
            retain_page_artifacts: false,
            discover_only: false,
            merge_backend: MergeBackend::Ghostscript,
            compatibility_level: "1.4".to_string(),
        }
    }
}

impl BindConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: BindConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Whether the OCR stage runs.
    pub fn ocr_enabled(&self) -> bool {
        !self.language.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        self.language.validate()?;
        if !COMPATIBILITY_LEVELS.contains(&self.compatibility_level.as_str()) {
            return Err(ScanbindError::InvalidConfig(format!(
                "unsupported PDF compatibility level '{}' (expected one of {})",
                self.compatibility_level,
                COMPATIBILITY_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
