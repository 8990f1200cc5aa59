// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error page renderer — the backstop that turns a per-item failure into a
// diagnostic page. Performs no I/O beyond formatting strings and must never
// fail.

use std::path::Path;

use printpdf::BuiltinFont;
use tracing::instrument;

use bindery_core::types::{PageGeometry, PageSet};

use crate::draw::{PageOps, builtin_fonts, finish_document};

/// Render a single diagnostic page naming the failing file and the reason.
#[instrument(skip(geometry, reason), fields(path = %path.display()))]
pub fn render(path: &Path, reason: &str, geometry: &PageGeometry) -> PageSet {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let (_, bold) = builtin_fonts(geometry.font);
    let mid = geometry.height_pt / 2.0;
    let margin = geometry.margin_pt;

    let mut page = PageOps::new();

    page.set_fill_color(0.8, 0.0, 0.0);
    page.text(&format!("ERROR: {name}"), bold, 14.0, margin, mid + 20.0);

    // Reason in monospace below the heading, wrapped to the character
    // budget and clipped at the bottom margin.
    page.set_fill_color(0.0, 0.0, 0.0);
    let reason_line_height = 12.0;
    let max_lines = ((mid - margin) / reason_line_height) as usize;
    for (index, line) in wrap_chars(reason, geometry.chars_per_line())
        .into_iter()
        .take(max_lines)
        .enumerate()
    {
        let y_pt = mid - index as f32 * reason_line_height;
        page.text(&line, BuiltinFont::Courier, 10.0, margin, y_pt);
    }

    PageSet {
        pdf_bytes: finish_document(&name, vec![page.into_page(geometry)]),
        page_count: 1,
    }
}

/// Hard-wrap a string into chunks of at most `width` characters.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
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

    #[test]
    fn renders_exactly_one_parsable_page() {
        let set = render(
            Path::new("broken.xlsx"),
            "spreadsheet parsing failed: not a zip",
            &geometry(),
        );
        assert_eq!(set.page_count, 1);
        let doc = lopdf::Document::load_mem(&set.pdf_bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn tolerates_very_long_reasons() {
        let reason = "x".repeat(50_000);
        let set = render(Path::new("big.bin"), &reason, &geometry());
        assert_eq!(set.page_count, 1);
    }

    #[test]
    fn tolerates_empty_reason_and_odd_paths() {
        let set = render(Path::new("/"), "", &geometry());
        assert_eq!(set.page_count, 1);
    }

    #[test]
    fn wrap_chars_splits_on_character_boundaries() {
        let lines = wrap_chars("αβγδε", 2);
        assert_eq!(lines, vec!["αβ", "γδ", "ε"]);
    }
}
