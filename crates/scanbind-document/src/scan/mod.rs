// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan input — discovery and classification of ScanTailor output pages.

pub mod discovery;

pub use discovery::{DiscoveryReport, DiscoveryWarning, PageDiscovery};
