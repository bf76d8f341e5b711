// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — inspect existing PDFs and merge page PDFs in-process using the
// `lopdf` crate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::PageMerger;
use tracing::{debug, info, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// An image XObject drawn by a page, as listed in its content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayerInfo {
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub color_space: Option<String>,
    pub has_soft_mask: bool,
}

/// Read-only view of a PDF document.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = Document::load(path).map_err(|err| {
            ScanbindError::PdfError(format!("failed to open {}: {}", path.display(), err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Load a PDF already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ScanbindError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of each page's MediaBox, in page order.
    ///
    /// Pages without a readable MediaBox report `(0.0, 0.0)`.
    pub fn page_sizes(&self) -> Vec<(f64, f64)> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| {
                inherited_attribute(&self.document, page_id, b"MediaBox")
                    .and_then(|obj| obj.as_array().ok())
                    .and_then(|bounds| media_box_size(bounds))
                    .unwrap_or((0.0, 0.0))
            })
            .collect()
    }

    /// Images drawn on page `page_number` (1-indexed), in drawing order.
    pub fn image_layers(&self, page_number: u32) -> Result<Vec<ImageLayerInfo>> {
        let doc = &self.document;
        let page_id = *doc.get_pages().get(&page_number).ok_or_else(|| {
            ScanbindError::PdfError(format!("page {page_number} not found"))
        })?;

        let content_bytes = doc.get_page_content(page_id).map_err(|err| {
            ScanbindError::PdfError(format!("cannot read content of page {page_number}: {err}"))
        })?;
        let content = Content::decode(&content_bytes).map_err(|err| {
            ScanbindError::PdfError(format!("cannot parse content of page {page_number}: {err}"))
        })?;

        let xobjects = inherited_attribute(doc, page_id, b"Resources")
            .and_then(|res| resolve(doc, res).as_dict().ok())
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|xo| resolve(doc, xo).as_dict().ok());

        let mut layers = Vec::new();
        for operation in content.operations.iter().filter(|op| op.operator == "Do") {
            let Some(name) = operation.operands.first().and_then(|o| o.as_name().ok()) else {
                continue;
            };
            let Some(stream) = xobjects
                .and_then(|xo| xo.get(name).ok())
                .and_then(|obj| resolve(doc, obj).as_stream().ok())
            else {
                warn!(page_number, "Content draws an unknown XObject");
                continue;
            };
            if stream.dict.get(b"Subtype").and_then(|s| s.as_name()).ok() != Some(b"Image".as_slice()) {
                continue;
            }
            let integer = |key: &[u8]| {
                stream
                    .dict
                    .get(key)
                    .and_then(|v| v.as_i64())
                    .unwrap_or(0)
            };
            layers.push(ImageLayerInfo {
                name: String::from_utf8_lossy(name).into_owned(),
                width: integer(b"Width"),
                height: integer(b"Height"),
                color_space: stream
                    .dict
                    .get(b"ColorSpace")
                    .and_then(|c| c.as_name())
                    .ok()
                    .map(|c| String::from_utf8_lossy(c).into_owned()),
                has_soft_mask: stream.dict.has(b"SMask"),
            });
        }
        Ok(layers)
    }
}

/// Concatenates page PDFs in-process, without Ghostscript.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMerger;

impl NativeMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merge documents in order into a single document.
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn merge_documents(&self, inputs: &[PathBuf]) -> Result<Document> {
        let (first, rest) = inputs
            .split_first()
            .ok_or_else(|| ScanbindError::MergeFailed("no page PDFs to merge".into()))?;

        let mut merged = load_for_merge(first)?;
        for path in rest {
            let other = load_for_merge(path)?;
            let mut cloner = PageCloner::new(&other);
            for (_, page_id) in other.get_pages() {
                cloner.append_page(&mut merged, page_id)?;
            }
        }

        info!(pages = merged.get_pages().len(), "Merge complete");
        Ok(merged)
    }
}

impl PageMerger for NativeMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let mut merged = self.merge_documents(inputs)?;
        merged.compress();
        merged.save(output).map_err(|err| {
            ScanbindError::MergeFailed(format!("failed to write {}: {}", output.display(), err))
        })?;
        Ok(())
    }
}

fn load_for_merge(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|err| {
        ScanbindError::MergeFailed(format!("failed to load {}: {}", path.display(), err))
    })
}

/// Copies pages from one document into another, cloning each referenced
/// object once.
struct PageCloner<'a> {
    source: &'a Document,
    remap: BTreeMap<ObjectId, ObjectId>,
}

impl<'a> PageCloner<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            remap: BTreeMap::new(),
        }
    }

    /// Clone page `page_id` and append it as the last page of `target`.
    fn append_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<()> {
        let source = self.source;
        let page = source
            .get_object(page_id)
            .and_then(|obj| obj.as_dict())
            .map_err(|err| {
                ScanbindError::MergeFailed(format!("cannot read page object {page_id:?}: {err}"))
            })?;

        let pages_id = target
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(|pages| pages.as_reference())
            .map_err(|err| ScanbindError::MergeFailed(format!("target has no page tree: {err}")))?;

        let new_id = target.new_object_id();
        self.remap.insert(page_id, new_id);

        let mut cloned = self.clone_dictionary(target, page);
        for key in INHERITABLE {
            if !cloned.has(key)
                && let Some(value) = inherited_attribute(source, page_id, key)
            {
                let value = self.clone_object(target, value);
                cloned.set(key.to_vec(), value);
            }
        }
        cloned.set("Parent", Object::Reference(pages_id));
        target.objects.insert(new_id, Object::Dictionary(cloned));

        if let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) {
            if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
                kids.push(Object::Reference(new_id));
            }
            if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
                *count += 1;
            }
        }
        Ok(())
    }

    fn clone_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(&mapped) = self.remap.get(&id) {
            return Object::Reference(mapped);
        }
        let source = self.source;
        match source.get_object(id) {
            Ok(referenced) => {
                let new_id = target.new_object_id();
                self.remap.insert(id, new_id);
                let cloned = self.clone_object(target, referenced);
                target.objects.insert(new_id, cloned);
                Object::Reference(new_id)
            }
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        }
    }

    /// Clone a dictionary, dropping `/Parent` so the source page tree is not
    /// pulled in.
    fn clone_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut cloned = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            let value = self.clone_object(target, value);
            cloned.set(key.clone(), value);
        }
        cloned
    }

    fn clone_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.clone_reference(target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.clone_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.clone_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.clone_dictionary(target, &stream.dict);
                Object::Stream(lopdf::Stream::new(dict, stream.content.clone()))
            }
            other => other.clone(),
        }
    }
}

/// Follow a single reference, returning the object itself otherwise.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Look up `key` on the page or the nearest ancestor that defines it.
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_object(page_id).ok()?.as_dict().ok()?;
    // Bounded walk; malformed files can contain Parent cycles.
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_object(parent).ok()?.as_dict().ok()?;
    }
    None
}

fn media_box_size(bounds: &[Object]) -> Option<(f64, f64)> {
    let number = |obj: &Object| match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    };
    if bounds.len() != 4 {
        return None;
    }
    let llx = number(&bounds[0])?;
    let lly = number(&bounds[1])?;
    let urx = number(&bounds[2])?;
    let ury = number(&bounds[3])?;
    Some(((urx - llx).abs(), (ury - lly).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::{CompositeLayer, PageAssembler, PageComposition};
    use image::GrayImage;
    use scanbind_core::PageSize;

    fn page_pdf(dir: &Path, name: &str, width_pt: f64, pixels: u32) -> PathBuf {
        let composition = PageComposition::single(
            PageSize {
                width_pt,
                height_pt: 100.0,
            },
            CompositeLayer::Gray(GrayImage::new(pixels, pixels)),
        );
        let bytes = PageAssembler::new().assemble(composition).expect("assemble");
        let path = dir.join(name);
        std::fs::write(&path, bytes).expect("write page");
        path
    }

    #[test]
    fn merge_keeps_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let inputs = vec![
            page_pdf(dir.path(), "a.pdf", 100.0, 4),
            page_pdf(dir.path(), "b.pdf", 200.0, 5),
            page_pdf(dir.path(), "c.pdf", 300.0, 6),
        ];
        let output = dir.path().join("merged.pdf");
        NativeMerger::new().merge(&inputs, &output).expect("merge");

        let inspector = PdfInspector::open(&output).expect("open merged");
        assert_eq!(inspector.page_count(), 3);
        let widths: Vec<i64> = inspector
            .page_sizes()
            .iter()
            .map(|(w, _)| w.round() as i64)
            .collect();
        assert_eq!(widths, vec![100, 200, 300]);

        let third = inspector.image_layers(3).expect("layers");
        assert_eq!(third[0].width, 6);
    }

    #[test]
    fn merge_single_input_copies_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let inputs = vec![page_pdf(dir.path(), "only.pdf", 50.0, 2)];
        let output = dir.path().join("merged.pdf");
        NativeMerger::new().merge(&inputs, &output).expect("merge");
        assert_eq!(PdfInspector::open(&output).expect("open").page_count(), 1);
    }

    #[test]
    fn merge_without_inputs_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = NativeMerger::new().merge(&[], &dir.path().join("merged.pdf"));
        assert!(matches!(result, Err(ScanbindError::MergeFailed(_))));
    }

    #[test]
    fn merge_reports_unreadable_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bogus = dir.path().join("bogus.pdf");
        std::fs::write(&bogus, b"not a pdf").expect("write");
        let result = NativeMerger::new().merge(&[bogus], &dir.path().join("merged.pdf"));
        assert!(matches!(result, Err(ScanbindError::MergeFailed(_))));
    }

    #[test]
    fn media_box_handles_offsets() {
        let bounds = vec![
            Object::Integer(10),
            Object::Integer(20),
            Object::Real(110.0),
            Object::Integer(220),
        ];
        assert_eq!(media_box_size(&bounds), Some((100.0, 200.0)));
        assert_eq!(media_box_size(&bounds[..2]), None);
    }
}
