// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared page-drawing helpers over `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: pages are `Vec<Op>` operation lists
// wrapped in `PdfPage`, serialised via `PdfDocument::save()`. The renderers
// build their ops through `PageOps` so cursor/font boilerplate lives in one
// place.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, Rgb, TextItem, WindingOrder,
};

use bindery_core::types::{FontFamily, PageGeometry};

/// Convert a length in points to printpdf's `Mm`.
pub(crate) fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// The regular and bold builtin fonts for a configured family.
pub(crate) fn builtin_fonts(family: FontFamily) -> (BuiltinFont, BuiltinFont) {
    match family {
        FontFamily::Helvetica => (BuiltinFont::Helvetica, BuiltinFont::HelveticaBold),
        FontFamily::Courier => (BuiltinFont::Courier, BuiltinFont::CourierBold),
        FontFamily::TimesRoman => (BuiltinFont::TimesRoman, BuiltinFont::TimesBold),
    }
}

fn line_point(x_pt: f32, y_pt: f32) -> LinePoint {
    LinePoint {
        p: Point {
            x: Pt(x_pt),
            y: Pt(y_pt),
        },
        bezier: false,
    }
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

/// Operation-list builder for one drawn page.
pub(crate) struct PageOps {
    ops: Vec<Op>,
}

impl PageOps {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Write one line of text with its baseline at `(x_pt, y_pt)`.
    pub fn text(&mut self, content: &str, font: BuiltinFont, size_pt: f32, x_pt: f32, y_pt: f32) {
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x_pt),
                y: Pt(y_pt),
            },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size_pt),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(content.to_string())],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    pub fn set_fill_color(&mut self, r: f32, g: f32, b: f32) {
        self.ops.push(Op::SetFillColor { col: rgb(r, g, b) });
    }

    pub fn set_outline_color(&mut self, r: f32, g: f32, b: f32) {
        self.ops.push(Op::SetOutlineColor { col: rgb(r, g, b) });
    }

    /// Horizontal rule from `x1_pt` to `x2_pt` at height `y_pt`.
    pub fn rule(&mut self, x1_pt: f32, x2_pt: f32, y_pt: f32, thickness_pt: f32) {
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(thickness_pt),
        });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![line_point(x1_pt, y_pt), line_point(x2_pt, y_pt)],
                is_closed: false,
            },
        });
    }

    /// Axis-aligned rectangle with its lower-left corner at `(x_pt, y_pt)`.
    pub fn rect(&mut self, x_pt: f32, y_pt: f32, w_pt: f32, h_pt: f32, mode: PaintMode) {
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        line_point(x_pt, y_pt),
                        line_point(x_pt + w_pt, y_pt),
                        line_point(x_pt + w_pt, y_pt + h_pt),
                        line_point(x_pt, y_pt + h_pt),
                    ],
                }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    /// Finish the page at the geometry's configured size.
    pub fn into_page(self, geometry: &PageGeometry) -> PdfPage {
        self.into_page_sized(geometry.width_pt, geometry.height_pt)
    }

    /// Finish the page at an explicit size in points.
    pub fn into_page_sized(self, width_pt: f32, height_pt: f32) -> PdfPage {
        PdfPage::new(pt_to_mm(width_pt), pt_to_mm(height_pt), self.ops)
    }
}

/// Draw the file-name header and its horizontal rule.
///
/// Both sit in the top margin band, just above the content area, so the
/// inter-margin height stays fully available for content lines.
pub(crate) fn draw_header(page: &mut PageOps, geometry: &PageGeometry, title: &str) {
    let (_, bold) = builtin_fonts(geometry.font);
    let top = geometry.height_pt - geometry.margin_pt;
    page.text(
        title,
        bold,
        geometry.font_size_pt + 2.0,
        geometry.margin_pt,
        top + 6.0,
    );
    page.rule(
        geometry.margin_pt,
        geometry.width_pt - geometry.margin_pt,
        top + 2.0,
        1.0,
    );
}

/// Draw a centred `- n -` footer when page numbers are enabled.
///
/// `n` counts within the current source item; each item's fragment is
/// rendered independently of its final position in the output.
pub(crate) fn draw_page_number(page: &mut PageOps, geometry: &PageGeometry, n: usize) {
    if !geometry.show_page_numbers {
        return;
    }
    let (regular, _) = builtin_fonts(geometry.font);
    let size_pt = (geometry.font_size_pt - 2.0).max(6.0);
    let label = format!("- {n} -");
    // Rough centring from the same glyph-width estimate the budgets use.
    let label_width_pt = label.chars().count() as f32 * size_pt * 0.5;
    page.text(
        &label,
        regular,
        size_pt,
        (geometry.width_pt - label_width_pt) / 2.0,
        geometry.margin_pt / 2.0,
    );
}

/// Serialise drawn pages into a standalone PDF fragment.
pub(crate) fn finish_document(title: &str, pages: Vec<PdfPage>) -> Vec<u8> {
    let mut doc = PdfDocument::new(title);
    doc.with_pages(pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}
