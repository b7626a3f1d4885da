// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create new PDF documents from raster images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use folio_core::error::{FolioError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Points per inch; rendering at this DPI maps one pixel to one point.
const POINTS_PER_INCH: f32 = 72.0;

/// Creates new PDF documents from raster images. Each page takes the
/// image's pixel size, one pixel per point.
#[derive(Debug, Default)]
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per image, in the order given.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[&[u8]]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(FolioError::InvalidOption("no images supplied".into()));
        }

        let title = self.title.as_deref().unwrap_or("Folio Images");
        info!(title, "Creating image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages = Vec::with_capacity(images.len());

        for (index, image_bytes) in images.iter().enumerate() {
            // Decode the image to get its dimensions and pixel data.
            let dynamic_image = ::image::load_from_memory(image_bytes).map_err(|err| {
                FolioError::Image(format!("failed to decode image #{}: {}", index + 1, err))
            })?;

            let img_width = dynamic_image.width() as usize;
            let img_height = dynamic_image.height() as usize;

            // Convert to RGB8 for printpdf.
            let rgb_image = dynamic_image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let (width_pt, height_pt) = (img_width as f32, img_height as f32);
            debug!(index, width_pt, height_pt, "Image placed on page");

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(POINTS_PER_INCH),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(
                points_to_mm(width_pt),
                points_to_mm(height_pt),
                ops,
            ));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            output_bytes = output.len(),
            warnings = warnings.len(),
            "Image PDF serialised"
        );

        Ok(output)
    }
}

fn points_to_mm(points: f32) -> Mm {
    Mm(points / POINTS_PER_INCH * 25.4)
}
