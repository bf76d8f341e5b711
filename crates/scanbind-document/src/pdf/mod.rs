// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — single-page assembly, inspection, and in-process merging.

pub mod reader;
pub mod writer;

pub use reader::{ImageLayerInfo, NativeMerger, PdfInspector};
pub use writer::{CompositeLayer, PageAssembler, PageComposition};
