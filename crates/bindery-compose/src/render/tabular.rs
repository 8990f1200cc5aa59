// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tabular renderer — streams spreadsheet rows as pipe-delimited monospace
// table pages, one sheet per page break.
//
// Only materialized cell values are rendered; formulas are the workbook
// reader's concern. Workbook parsing sits behind the `spreadsheets` feature
// gate, so a build without it degrades to a renderer-level failure rather
// than a missing symbol.

use tracing::instrument;

use bindery_core::config::TabularOptions;
use bindery_core::types::{PageGeometry, PageSet};

use crate::draw::{PageOps, builtin_fonts, draw_page_number, finish_document};

/// Lines the sheet heading occupies at the top of a sheet's first page.
const HEADING_LINES: usize = 2;

/// Suffix appended when a row line exceeds the character budget.
const ELLIPSIS: &str = "...";

/// One line of laid-out table content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TableLine {
    /// `Sheet: <name> (<filename>)`, drawn larger and bold.
    SheetHeading(String),
    /// A flattened row; `header` rows are drawn in the bold face.
    Row { text: String, header: bool },
}

/// Load a workbook and render every sheet.
#[cfg(feature = "spreadsheets")]
#[instrument(skip(geometry, options), fields(path = %path.display()))]
pub fn render_file(
    path: &std::path::Path,
    geometry: &PageGeometry,
    options: &TabularOptions,
) -> bindery_core::error::Result<PageSet> {
    use bindery_core::error::BinderyError;
    use calamine::{Data, Reader, open_workbook_auto};
    use tracing::info;

    let mut workbook = open_workbook_auto(path).map_err(|err| {
        BinderyError::SpreadsheetError(format!("failed to open {}: {err}", path.display()))
    })?;

    let sheet_names = workbook.sheet_names().to_owned();
    let mut sheets: Vec<(String, Vec<Vec<Option<String>>>)> = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let range = workbook.worksheet_range(&name).map_err(|err| {
            BinderyError::SpreadsheetError(format!(
                "failed to read sheet {name:?} of {}: {err}",
                path.display()
            ))
        })?;
        let rows: Vec<Vec<Option<String>>> = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => None,
                        other => Some(other.to_string()),
                    })
                    .collect()
            })
            .collect();
        sheets.push((name, rows));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    info!(sheets = sheets.len(), "workbook loaded");
    Ok(render_sheets(&file_name, &sheets, geometry, options))
}

/// Stub used when spreadsheet support is compiled out.
#[cfg(not(feature = "spreadsheets"))]
#[instrument(skip(_geometry, _options), fields(path = %path.display()))]
pub fn render_file(
    path: &std::path::Path,
    _geometry: &PageGeometry,
    _options: &TabularOptions,
) -> bindery_core::error::Result<PageSet> {
    Err(bindery_core::error::BinderyError::UnsupportedSource(
        format!(
            "cannot render {}: built without spreadsheet support (enable the `spreadsheets` feature)",
            path.display()
        ),
    ))
}

/// Render already-materialized sheets into a PDF fragment.
pub(crate) fn render_sheets(
    file_name: &str,
    sheets: &[(String, Vec<Vec<Option<String>>>)],
    geometry: &PageGeometry,
    options: &TabularOptions,
) -> PageSet {
    let pages = paginate_sheets(file_name, sheets, geometry, options);
    draw_table_pages(file_name, &pages, geometry)
}

/// Lay sheets out into pages of [`TableLine`]s.
///
/// Every sheet starts on a fresh page; rows that overflow the vertical
/// budget continue on the next page without repeating the heading.
pub(crate) fn paginate_sheets(
    file_name: &str,
    sheets: &[(String, Vec<Vec<Option<String>>>)],
    geometry: &PageGeometry,
    options: &TabularOptions,
) -> Vec<Vec<TableLine>> {
    let lines_per_page = geometry.lines_per_page();
    let budget = geometry.chars_per_line();

    let mut pages: Vec<Vec<TableLine>> = Vec::new();
    for (sheet_name, rows) in sheets {
        let mut page: Vec<TableLine> = vec![TableLine::SheetHeading(format!(
            "Sheet: {sheet_name} ({file_name})"
        ))];
        let mut used = HEADING_LINES;

        for (row_index, row) in rows.iter().enumerate() {
            if used >= lines_per_page {
                pages.push(std::mem::take(&mut page));
                used = 0;
            }
            page.push(TableLine::Row {
                text: flatten_row(row, budget),
                header: options.first_row_is_header && row_index == 0,
            });
            used += 1;
        }
        pages.push(page);
    }
    pages
}

/// Join a row's cells with ` | `, rendering null cells as empty strings, and
/// truncate to the character budget with an ellipsis marker.
fn flatten_row(row: &[Option<String>], budget: usize) -> String {
    let text = row
        .iter()
        .map(|cell| cell.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" | ");

    if text.chars().count() <= budget {
        return text;
    }
    let keep = budget.saturating_sub(ELLIPSIS.len());
    let truncated: String = text.chars().take(keep).collect();
    format!("{truncated}{ELLIPSIS}")
}

/// Draw laid-out table pages into a PDF fragment.
fn draw_table_pages(
    file_name: &str,
    pages: &[Vec<TableLine>],
    geometry: &PageGeometry,
) -> PageSet {
    let (regular, bold) = builtin_fonts(geometry.font);
    let line_height = geometry.line_height_pt();
    let content_top = geometry.height_pt - geometry.margin_pt;
    let heading_size = geometry.font_size_pt + 4.0;

    let mut pdf_pages = Vec::with_capacity(pages.len());
    for (index, lines) in pages.iter().enumerate() {
        let mut page = PageOps::new();
        let mut used = 0usize;

        for line in lines {
            match line {
                TableLine::SheetHeading(heading) => {
                    let y_pt = content_top - line_height;
                    page.text(heading, bold, heading_size, geometry.margin_pt, y_pt);
                    used += HEADING_LINES;
                }
                TableLine::Row { text, header } => {
                    let y_pt = content_top - (used as f32 + 1.0) * line_height;
                    let font = if *header { bold } else { regular };
                    if !text.is_empty() {
                        page.text(text, font, geometry.font_size_pt, geometry.margin_pt, y_pt);
                    }
                    used += 1;
                }
            }
        }

        draw_page_number(&mut page, geometry, index + 1);
        pdf_pages.push(page.into_page(geometry));
    }

    PageSet {
        pdf_bytes: finish_document(file_name, pdf_pages),
        page_count: pages.len(),
    }
}
