// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text paginator — wraps and paginates arbitrary text content into
// page-sized blocks, then draws them.
//
// Wrapping is character-count based, not word-aware: source files are often
// code or logs where preserving column structure matters more than prose
// wrapping.

use std::path::Path;

use tracing::{debug, info, instrument};

use bindery_core::error::Result;
use bindery_core::types::{PageGeometry, PageSet, RenderOutcome};

use crate::draw::{PageOps, builtin_fonts, draw_header, draw_page_number, finish_document};
use crate::sources;

/// Render a text file into paginated pages.
///
/// An empty file yields [`RenderOutcome::Nothing`]: the item succeeded but
/// contributes no pages.
#[instrument(skip(geometry), fields(path = %path.display()))]
pub fn render_file(path: &Path, geometry: &PageGeometry) -> Result<RenderOutcome> {
    let content = sources::read_text_with_fallback(path)?;
    if content.is_empty() {
        debug!("empty text file, nothing to add");
        return Ok(RenderOutcome::Nothing);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let pages = paginate(&content, geometry);
    info!(pages = pages.len(), "text content paginated");
    Ok(RenderOutcome::Pages(draw_pages(&name, &pages, geometry)))
}

/// Split raw text into pages of physical lines.
///
/// Line endings are normalized to `\n`, tabs expand to four columns, and
/// each logical line is hard-wrapped at the geometry's character budget. A
/// single trailing newline is treated as a terminator, not an extra blank
/// line.
pub(crate) fn paginate(raw: &str, geometry: &PageGeometry) -> Vec<Vec<String>> {
    let chars_per_line = geometry.chars_per_line();
    let lines_per_page = geometry.lines_per_page();

    let normalized = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "    ");
    let normalized = normalized.strip_suffix('\n').unwrap_or(&normalized);

    let mut physical: Vec<String> = Vec::new();
    for logical in normalized.split('\n') {
        if logical.is_empty() {
            physical.push(String::new());
            continue;
        }
        let chars: Vec<char> = logical.chars().collect();
        for chunk in chars.chunks(chars_per_line) {
            physical.push(chunk.iter().collect());
        }
    }

    physical
        .chunks(lines_per_page)
        .map(|page| page.to_vec())
        .collect()
}

/// Draw paginated lines into a PDF fragment, one header per page.
pub(crate) fn draw_pages(file_name: &str, pages: &[Vec<String>], geometry: &PageGeometry) -> PageSet {
    let (regular, _) = builtin_fonts(geometry.font);
    let line_height = geometry.line_height_pt();
    let content_top = geometry.height_pt - geometry.margin_pt;

    let mut pdf_pages = Vec::with_capacity(pages.len());
    for (index, lines) in pages.iter().enumerate() {
        let mut page = PageOps::new();
        let title = if index == 0 {
            format!("File: {file_name}")
        } else {
            format!("File: {file_name} (Cont.)")
        };
        draw_header(&mut page, geometry, &title);

        for (line_index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y_pt = content_top - (line_index as f32 + 1.0) * line_height;
            page.text(line, regular, geometry.font_size_pt, geometry.margin_pt, y_pt);
        }

        draw_page_number(&mut page, geometry, index + 1);
        pdf_pages.push(page.into_page(geometry));
    }

    PageSet {
        pdf_bytes: finish_document(file_name, pdf_pages),
        page_count: pages.len(),
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

    #[test]
    fn exact_multiple_of_page_capacity_fills_pages_exactly() {
        let geometry = geometry();
        let lines_per_page = geometry.lines_per_page();
        let raw: String = (0..lines_per_page * 3)
            .map(|i| format!("line {i}\n"))
            .collect();

        let pages = paginate(&raw, &geometry);
        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert_eq!(page.len(), lines_per_page);
        }
    }

    #[test]
    fn single_character_yields_one_line_page() {
        let pages = paginate("a", &geometry());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], vec!["a".to_string()]);
    }

    #[test]
    fn long_lines_hard_wrap_at_character_budget() {
        let geometry = geometry();
        let budget = geometry.chars_per_line();
        let raw = "x".repeat(budget + 1);

        let pages = paginate(&raw, &geometry);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][0].chars().count(), budget);
        assert_eq!(pages[0][1], "x");
    }

    #[test]
    fn wrapping_respects_multibyte_characters() {
        let geometry = geometry();
        let budget = geometry.chars_per_line();
        let raw = "é".repeat(budget + 5);

        let pages = paginate(&raw, &geometry);
        assert_eq!(pages[0][0].chars().count(), budget);
        assert_eq!(pages[0][1].chars().count(), 5);
    }

    #[test]
    fn line_endings_and_tabs_normalize() {
        let pages = paginate("a\r\nb\rc\td", &geometry());
        assert_eq!(
            pages[0],
            vec!["a".to_string(), "b".to_string(), "c    d".to_string()]
        );
    }

    #[test]
    fn trailing_newline_is_a_terminator() {
        let pages = paginate("hello\nworld\n", &geometry());
        assert_eq!(pages[0], vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn blank_lines_are_preserved() {
        let pages = paginate("a\n\nb", &geometry());
        assert_eq!(
            pages[0],
            vec!["a".to_string(), String::new(), "b".to_string()]
        );
    }

    #[test]
    fn drawn_fragment_page_count_matches_layout() {
        let geometry = geometry();
        let lines_per_page = geometry.lines_per_page();
        let raw: String = (0..lines_per_page + 1).map(|i| format!("{i}\n")).collect();

        let pages = paginate(&raw, &geometry);
        assert_eq!(pages.len(), 2);

        let set = draw_pages("sample.txt", &pages, &geometry);
        assert_eq!(set.page_count, 2);
        let doc = lopdf::Document::load_mem(&set.pdf_bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn empty_file_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let outcome = render_file(&path, &geometry()).unwrap();
        assert_eq!(outcome, RenderOutcome::Nothing);
    }

    #[test]
    fn two_line_file_renders_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.txt");
        std::fs::write(&path, "hello\nworld").unwrap();

        match render_file(&path, &geometry()).unwrap() {
            RenderOutcome::Pages(set) => assert_eq!(set.page_count, 1),
            other => panic!("expected pages, got {other:?}"),
        }
    }
}
