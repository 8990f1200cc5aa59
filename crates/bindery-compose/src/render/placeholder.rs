// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placeholder renderer — synthesizes a fixed-layout "file attachment" info
// card for inputs that cannot be visually rendered.

use std::path::Path;

use printpdf::PaintMode;
use tracing::{debug, instrument};

use bindery_core::types::{PageGeometry, PageSet};

use crate::draw::{PageOps, builtin_fonts, finish_document};
use crate::sources::{self, FileInfo};

/// Uppercase extension label for the info card, `FILE` when there is none.
pub(crate) fn type_label(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_uppercase())
        .unwrap_or_else(|| "FILE".to_string())
}

/// Render the info card page for a non-renderable file.
///
/// Infallible: stat errors degrade to an `Unknown` size, and the drawing
/// itself performs no I/O.
#[instrument(skip(geometry), fields(path = %path.display()))]
pub fn render(path: &Path, geometry: &PageGeometry) -> PageSet {
    let info = FileInfo::probe(path);
    let size_label = info
        .size_bytes
        .map(sources::human_size)
        .unwrap_or_else(|| "Unknown".to_string());
    let type_label = type_label(path);

    let (regular, bold) = builtin_fonts(geometry.font);
    let width = geometry.width_pt;
    let height = geometry.height_pt;
    let margin = geometry.margin_pt;

    let mut page = PageOps::new();

    // Card region: a light grey box with a grey border in the upper half.
    page.set_fill_color(0.95, 0.95, 0.95);
    page.set_outline_color(0.6, 0.6, 0.6);
    page.rect(
        margin,
        height - 300.0,
        width - 2.0 * margin,
        200.0,
        PaintMode::FillStroke,
    );
    page.set_fill_color(0.0, 0.0, 0.0);

    let text_x = margin + 20.0;
    page.text("FILE ATTACHMENT", bold, 16.0, text_x, height - 140.0);
    page.text(
        &format!("Filename: {}", info.name),
        regular,
        12.0,
        text_x,
        height - 180.0,
    );
    page.text(
        &format!("Size: {size_label}"),
        regular,
        12.0,
        text_x,
        height - 200.0,
    );
    page.text(
        &format!("Type: {type_label}"),
        regular,
        12.0,
        text_x,
        height - 220.0,
    );
    page.text(
        "This file could not be rendered; the original content is not included.",
        regular,
        10.0,
        text_x,
        height - 260.0,
    );

    debug!(name = %info.name, %size_label, %type_label, "placeholder card drawn");
    PageSet {
        pdf_bytes: finish_document(&info.name, vec![page.into_page(geometry)]),
        page_count: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::types::FontFamily;

    fn geometry() -> PageGeometry {
        PageGeometry {
            width_pt: 595.0,
            height_pt: 842.0,
            margin_pt: 50.0,
            font: FontFamily::Helvetica,
            font_size_pt: 10.0,
            show_page_numbers: false,
        }
    }

    fn page_content(bytes: &[u8]) -> Vec<u8> {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&1];
        doc.get_page_content(page_id).unwrap()
    }

    #[test]
    fn type_labels() {
        assert_eq!(type_label(Path::new("setup.exe")), "EXE");
        assert_eq!(type_label(Path::new("archive.tar.GZ")), "GZ");
        assert_eq!(type_label(Path::new("no_extension")), "FILE");
    }

    #[test]
    fn always_exactly_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let set = render(&path, &geometry());
        assert_eq!(set.page_count, 1);
        let doc = lopdf::Document::load_mem(&set.pdf_bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn rendering_is_idempotent_for_unchanged_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.exe");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();

        let first = render(&path, &geometry());
        let second = render(&path, &geometry());
        assert_eq!(
            page_content(&first.pdf_bytes),
            page_content(&second.pdf_bytes)
        );
    }

    #[test]
    fn missing_file_still_renders_a_card() {
        // Stat failure degrades to "Unknown" size instead of failing.
        let set = render(Path::new("/nonexistent/ghost.dll"), &geometry());
        assert_eq!(set.page_count, 1);
    }
}
