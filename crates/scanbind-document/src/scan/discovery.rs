// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page discovery — enumerates ScanTailor's output directory, pairs mixed-page
// layers by file name, and probes every asset's geometry.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::{ImageInfo, InputLayout, LayerRole, PageKind, PageRecord, PageSource};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::image::raster;

/// Something odd about the input that does not stop the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "warning", rename_all = "kebab-case")]
pub enum DiscoveryWarning {
    /// Layer files with no page of the same name in the output directory.
    /// `roles` lists every layer directory the name appears in.
    OrphanedMixedAsset {
        filename: String,
        roles: Vec<LayerRole>,
    },
    /// Only one of the two layers exists; the page is treated as standard.
    PartialMixedPair { filename: String, missing: LayerRole },
    /// A file could not be opened as an image.
    UnreadableAsset { path: PathBuf, reason: String },
    /// Foreground and background disagree on size or resolution.
    GeometryMismatch {
        filename: String,
        foreground: ImageInfo,
        background: ImageInfo,
    },
}

impl std::fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrphanedMixedAsset { filename, roles } => {
                let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
                write!(f, "{} layer {filename} has no matching page", roles.join(" and "))
            }
            Self::PartialMixedPair { filename, missing } => {
                write!(f, "{filename} has no {missing} layer, treating as standard")
            }
            Self::UnreadableAsset { path, reason } => {
                write!(f, "cannot read {}: {reason}", path.display())
            }
            Self::GeometryMismatch {
                filename,
                foreground,
                background,
            } => write!(
                f,
                "{filename}: foreground is {} px at {} dpi, background is {} px at {} dpi",
                foreground.pixel_size,
                foreground.resolution,
                background.pixel_size,
                background.resolution
            ),
        }
    }
}

/// Result of a discovery pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Pages in ascending file-name order.
    pub pages: Vec<PageRecord>,
    pub warnings: Vec<DiscoveryWarning>,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn standard_count(&self) -> usize {
        self.count(PageKind::Standard)
    }

    pub fn mixed_count(&self) -> usize {
        self.count(PageKind::Mixed)
    }

    fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|page| page.kind() == kind).count()
    }
}

/// Scans an [`InputLayout`] for pages.
pub struct PageDiscovery<'a> {
    layout: &'a InputLayout,
}

impl<'a> PageDiscovery<'a> {
    pub fn new(layout: &'a InputLayout) -> Self {
        Self { layout }
    }

    /// Enumerate and classify every page.
    ///
    /// Fails only when the output directory is missing or cannot be listed;
    /// problems with individual files become warnings.
    #[instrument(skip_all, fields(out_dir = %self.layout.out_dir.display()))]
    pub fn discover(&self) -> Result<DiscoveryReport> {
        let layout = self.layout;
        if !layout.out_dir.is_dir() {
            return Err(ScanbindError::InputDirMissing {
                path: layout.out_dir.clone(),
            });
        }

        let page_names = list_tiffs(&layout.out_dir)?;
        let foreground_names = list_optional_tiffs(&layout.foreground_dir)?;
        let background_names = list_optional_tiffs(&layout.background_dir)?;
        debug!(
            pages = page_names.len(),
            foreground = foreground_names.len(),
            background = background_names.len(),
            "Directory listing complete"
        );

        let mut report = DiscoveryReport::default();
        let layer_names: BTreeSet<&String> = foreground_names.union(&background_names).collect();
        for filename in layer_names {
            if page_names.contains(filename) {
                continue;
            }
            let roles: Vec<LayerRole> = [
                (LayerRole::Foreground, &foreground_names),
                (LayerRole::Background, &background_names),
            ]
            .into_iter()
            .filter(|(_, names)| names.contains(filename))
            .map(|(role, _)| role)
            .collect();
            warn!(%filename, ?roles, "Layer without a page");
            report.warnings.push(DiscoveryWarning::OrphanedMixedAsset {
                filename: filename.clone(),
                roles,
            });
        }

        for filename in &page_names {
            let in_foreground = foreground_names.contains(filename);
            let in_background = background_names.contains(filename);
            let record = self.classify(filename, in_foreground, in_background, &mut report.warnings);
            report.pages.push(record);
        }

        info!(
            pages = report.pages.len(),
            mixed = report.mixed_count(),
            warnings = report.warnings.len(),
            "Discovery complete"
        );
        Ok(report)
    }

    fn classify(
        &self,
        filename: &str,
        in_foreground: bool,
        in_background: bool,
        warnings: &mut Vec<DiscoveryWarning>,
    ) -> PageRecord {
        let layout = self.layout;
        let path = layout.out_dir.join(filename);

        if in_foreground && in_background {
            let foreground = layout.foreground_dir.join(filename);
            let background = layout.background_dir.join(filename);
            let foreground_info = probe_or_warn(&foreground, warnings);
            let background_info = probe_or_warn(&background, warnings);

            if !foreground_info.same_geometry(&background_info) {
                warn!(%filename, "Foreground and background geometry differ");
                warnings.push(DiscoveryWarning::GeometryMismatch {
                    filename: filename.to_string(),
                    foreground: foreground_info,
                    background: background_info,
                });
            }

            return PageRecord {
                filename: filename.to_string(),
                path,
                source: PageSource::Mixed {
                    foreground,
                    background,
                },
                pixel_size: background_info.pixel_size,
                resolution: background_info.resolution,
            };
        }

        if in_foreground != in_background {
            let missing = if in_foreground {
                LayerRole::Background
            } else {
                LayerRole::Foreground
            };
            warn!(%filename, %missing, "Mixed page is missing a layer, treating as standard");
            warnings.push(DiscoveryWarning::PartialMixedPair {
                filename: filename.to_string(),
                missing,
            });
        }

        let page_info = probe_or_warn(&path, warnings);
        PageRecord {
            filename: filename.to_string(),
            path: path.clone(),
            source: PageSource::Standard { image: path },
            pixel_size: page_info.pixel_size,
            resolution: page_info.resolution,
        }
    }
}

fn probe_or_warn(path: &Path, warnings: &mut Vec<DiscoveryWarning>) -> ImageInfo {
    match raster::probe(path) {
        Ok(info) => {
            if !info.resolution_tagged {
                debug!(path = %path.display(), "No resolution tags, assuming default");
            }
            info
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "Unreadable image");
            warnings.push(DiscoveryWarning::UnreadableAsset {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            ImageInfo::unreadable()
        }
    }
}

/// File names of `.tif`/`.tiff` regular files in `dir`, sorted.
fn list_tiffs(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_tiff(&path) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => {
                names.insert(name);
            }
            Err(name) => warn!(?name, "Skipping file with a non UTF-8 name"),
        }
    }
    Ok(names)
}

/// Like [`list_tiffs`], but a missing directory is simply empty.
fn list_optional_tiffs(dir: &Path) -> Result<BTreeSet<String>> {
    if dir.is_dir() {
        list_tiffs(dir)
    } else {
        Ok(BTreeSet::new())
    }
}

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiff_extension_is_case_insensitive() {
        assert!(is_tiff(Path::new("a.tif")));
        assert!(is_tiff(Path::new("a.TIFF")));
        assert!(is_tiff(Path::new("a.Tif")));
        assert!(!is_tiff(Path::new("a.png")));
        assert!(!is_tiff(Path::new("tif")));
    }

    #[test]
    fn listing_skips_other_files_and_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("b.tif"), b"").expect("write");
        std::fs::write(dir.path().join("a.TIFF"), b"").expect("write");
        std::fs::write(dir.path().join("notes.txt"), b"").expect("write");
        std::fs::create_dir(dir.path().join("dir.tif")).expect("mkdir");

        let names: Vec<String> = list_tiffs(dir.path()).expect("list").into_iter().collect();
        assert_eq!(names, vec!["a.TIFF".to_string(), "b.tif".to_string()]);
    }

    #[test]
    fn missing_layer_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let names = list_optional_tiffs(&dir.path().join("foreground")).expect("list");
        assert!(names.is_empty());
    }

    #[test]
    fn missing_output_dir_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = InputLayout::from_root(dir.path());
        let result = PageDiscovery::new(&layout).discover();
        assert!(matches!(result, Err(ScanbindError::InputDirMissing { .. })));
    }

    #[test]
    fn warnings_render_readably() {
        let warning = DiscoveryWarning::OrphanedMixedAsset {
            filename: "p9.tif".into(),
            roles: vec![LayerRole::Background],
        };
        assert_eq!(warning.to_string(), "background layer p9.tif has no matching page");
        let both = DiscoveryWarning::OrphanedMixedAsset {
            filename: "p9.tif".into(),
            roles: vec![LayerRole::Foreground, LayerRole::Background],
        };
        assert_eq!(
            both.to_string(),
            "foreground and background layer p9.tif has no matching page"
        );
    }
}
