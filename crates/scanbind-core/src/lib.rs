// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanbind — Core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod layout;
pub mod traits;
pub mod types;

pub use config::{BindConfig, MergeBackend, OcrLanguage, QualityPreset};
pub use error::{Result, ScanbindError};
pub use layout::InputLayout;
pub use traits::{OcrProcessor, PageCompressor, PageMerger};
pub use types::*;
