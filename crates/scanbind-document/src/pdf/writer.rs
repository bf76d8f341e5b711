// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembler — builds a single-page PDF whose page is exactly covered by
// one or two image layers, using the `lopdf` crate.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::{PageSize, PixelSize};
use tracing::{debug, instrument};

/// An image drawn full-page onto the PDF page.
#[derive(Debug, Clone)]
pub enum CompositeLayer {
    /// Drawn as `DeviceGray`.
    Gray(GrayImage),
    /// Drawn as `DeviceRGB`.
    Rgb(RgbImage),
    /// Drawn as `DeviceRGB` with the alpha channel as a soft mask.
    Rgba(RgbaImage),
}

impl CompositeLayer {
    /// Keep single-channel images grey, images with alpha translucent, and
    /// everything else RGB.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let color = image.color();
        if color.has_alpha() {
            Self::Rgba(image.into_rgba8())
        } else if color.channel_count() == 1 {
            Self::Gray(image.into_luma8())
        } else {
            Self::Rgb(image.into_rgb8())
        }
    }

    pub fn pixel_size(&self) -> PixelSize {
        let (width, height) = match self {
            Self::Gray(img) => img.dimensions(),
            Self::Rgb(img) => img.dimensions(),
            Self::Rgba(img) => img.dimensions(),
        };
        PixelSize::new(width, height)
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba(_))
    }
}

/// Everything needed to draw one page: its size and one or two layers.
///
/// The background is drawn first; the optional overlay is drawn on top.
#[derive(Debug, Clone)]
pub struct PageComposition {
    pub size: PageSize,
    pub background: CompositeLayer,
    pub overlay: Option<CompositeLayer>,
}

impl PageComposition {
    pub fn single(size: PageSize, layer: CompositeLayer) -> Self {
        Self {
            size,
            background: layer,
            overlay: None,
        }
    }

    pub fn layered(size: PageSize, background: CompositeLayer, overlay: CompositeLayer) -> Self {
        Self {
            size,
            background,
            overlay: Some(overlay),
        }
    }

    /// Consume the composition, yielding the layers in drawing order.
    pub fn into_layers(self) -> impl Iterator<Item = CompositeLayer> {
        std::iter::once(self.background).chain(self.overlay)
    }
}

/// Serialises a [`PageComposition`] into single-page PDF bytes.
#[derive(Debug, Clone)]
pub struct PageAssembler {
    pdf_version: String,
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self {
            pdf_version: "1.5".into(),
        }
    }
}

impl PageAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the page. Every layer is scaled to cover the page exactly.
    ///
    /// Layer pixels are moved into the PDF streams, so the composition is
    /// consumed.
    #[instrument(skip_all, fields(size = %composition.size))]
    pub fn assemble(&self, composition: PageComposition) -> Result<Vec<u8>> {
        let size = composition.size;
        if !(size.width_pt > 0.0 && size.height_pt > 0.0) {
            return Err(ScanbindError::InvalidGeometry(format!(
                "page size {size} is not positive"
            )));
        }
        let width = size.width_pt as f32;
        let height = size.height_pt as f32;

        let mut doc = Document::with_version(self.pdf_version.as_str());
        let pages_id = doc.new_object_id();

        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();
        let mut layer_count = 0;
        for (index, layer) in composition.into_layers().enumerate() {
            layer_count += 1;
            let name = format!("Im{index}");
            let image_id = add_image(&mut doc, layer);
            xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));

            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    Object::Real(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(height),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations }.encode().map_err(|err| {
            ScanbindError::PdfError(format!("failed to encode page content: {err}"))
        })?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));
        let page_id = doc.add_object(Object::Dictionary(page));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            ScanbindError::PdfError(format!("failed to serialise page: {err}"))
        })?;

        debug!(
            layers = layer_count,
            output_bytes = output.len(),
            "Page assembled"
        );
        Ok(output)
    }

    /// Assemble the page and write it to `path`.
    pub fn write_to_file(&self, composition: PageComposition, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.assemble(composition)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

/// Add an image XObject (plus soft mask for RGBA layers) and return its id.
fn add_image(doc: &mut Document, layer: CompositeLayer) -> ObjectId {
    let size = layer.pixel_size();
    match layer {
        CompositeLayer::Gray(img) => {
            doc.add_object(image_stream(size, b"DeviceGray", img.into_raw(), None))
        }
        CompositeLayer::Rgb(img) => {
            doc.add_object(image_stream(size, b"DeviceRGB", img.into_raw(), None))
        }
        CompositeLayer::Rgba(img) => {
            let pixels = size.width as usize * size.height as usize;
            let mut rgb = Vec::with_capacity(pixels * 3);
            let mut alpha = Vec::with_capacity(pixels);
            for px in img.pixels() {
                rgb.extend_from_slice(&px.0[..3]);
                alpha.push(px.0[3]);
            }
            let smask_id = doc.add_object(image_stream(size, b"DeviceGray", alpha, None));
            doc.add_object(image_stream(size, b"DeviceRGB", rgb, Some(smask_id)))
        }
    }
}

fn image_stream(
    size: PixelSize,
    color_space: &[u8],
    data: Vec<u8>,
    smask: Option<ObjectId>,
) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(size.width as i64));
    dict.set("Height", Object::Integer(size.height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    if let Some(smask_id) = smask {
        dict.set("SMask", Object::Reference(smask_id));
    }
    Stream::new(dict, data)
}
