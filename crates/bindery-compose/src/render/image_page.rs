// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image page renderer — wraps a raster image as a single full-bleed page
// sized to the image's native pixel dimensions.

use std::path::Path;

use printpdf::{
    Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, instrument};

use bindery_core::error::{BinderyError, Result};
use bindery_core::types::PageSet;

use crate::draw::pt_to_mm;

/// Render an image file as exactly one page.
///
/// The page is sized to the image's pixel dimensions at 72 dpi (one pixel is
/// one point), so the image fills the page edge to edge with no letterboxing
/// or rescaling. The configured page geometry does not apply here.
#[instrument(fields(path = %path.display()))]
pub fn render(path: &Path) -> Result<PageSet> {
    let dynamic_image = image::open(path).map_err(|err| {
        BinderyError::ImageError(format!("failed to decode {}: {err}", path.display()))
    })?;

    let width_px = dynamic_image.width() as usize;
    let height_px = dynamic_image.height() as usize;

    let rgb_image = dynamic_image.to_rgb8();
    let raw = RawImage {
        pixels: RawImageData::U8(rgb_image.into_raw()),
        width: width_px,
        height: height_px,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut doc = PdfDocument::new(&title);
    let xobject_id = doc.add_image(&raw);

    let ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            dpi: Some(72.0),
            rotate: None,
        },
    }];

    let page = PdfPage::new(
        pt_to_mm(width_px as f32),
        pt_to_mm(height_px as f32),
        ops,
    );
    doc.with_pages(vec![page]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    debug!(width_px, height_px, "image page created");
    Ok(PageSet {
        pdf_bytes: bytes,
        page_count: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lopdf::Object;

    fn as_f64(object: &Object) -> f64 {
        match object {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            other => panic!("not a number: {other:?}"),
        }
    }

    #[test]
    fn page_matches_native_pixel_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let img = RgbImage::from_pixel(100, 200, Rgb([200u8, 10, 10]));
        img.save(&path).unwrap();

        let set = render(&path).unwrap();
        assert_eq!(set.page_count, 1);

        let doc = lopdf::Document::load_mem(&set.pdf_bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = pages[&1];
        let media_box = doc
            .get_object(page_id)
            .ok()
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|dict| dict.get(b"MediaBox").ok())
            .and_then(|obj| obj.as_array().ok())
            .expect("page has a MediaBox");

        assert!((as_f64(&media_box[2]) - 100.0).abs() < 0.5);
        assert!((as_f64(&media_box[3]) - 200.0).abs() < 0.5);
    }

    #[test]
    fn undecodable_image_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"these are not pixels").unwrap();

        assert!(matches!(
            render(&path),
            Err(BinderyError::ImageError(_))
        ));
    }
}
