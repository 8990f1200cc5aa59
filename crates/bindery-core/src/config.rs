// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compositor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BinderyError, Result};
use crate::types::{FontFamily, PageGeometry, PaperSize};

/// Options for the tabular renderer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TabularOptions {
    /// Treat the first row of each sheet as a header row and render it in
    /// the bold face. This is an assumption about the data, not a detected
    /// property, so it is off by default.
    pub first_row_is_header: bool,
}

/// Compositor settings as supplied by the caller.
///
/// Resolved into an immutable [`PageGeometry`] once at run start; a run never
/// observes configuration changes made after that point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Paper size for drawn pages (image pages use the image's own size).
    pub paper_size: PaperSize,
    /// Font family for drawn text.
    pub font: FontFamily,
    /// Body font size in points.
    pub font_size_pt: f32,
    /// Page margin in points, applied on all four sides.
    pub margin_pt: f32,
    /// Draw a page-number footer on paginated drawn pages.
    pub show_page_numbers: bool,
    /// Tabular renderer options.
    pub tabular: TabularOptions,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            font: FontFamily::Helvetica,
            font_size_pt: 10.0,
            margin_pt: 50.0,
            show_page_numbers: false,
            tabular: TabularOptions::default(),
        }
    }
}

impl ComposeConfig {
    /// Resolve the configuration into concrete layout parameters.
    ///
    /// Validates the geometry invariants: page dimensions and font size must
    /// be strictly positive, and the margins must leave a non-empty content
    /// area.
    pub fn geometry(&self) -> Result<PageGeometry> {
        let (width_pt, height_pt) = self.paper_size.dimensions_pt();

        if width_pt <= 0.0 || height_pt <= 0.0 {
            return Err(BinderyError::InvalidGeometry(format!(
                "page dimensions must be positive, got {width_pt}x{height_pt} pt"
            )));
        }
        if self.font_size_pt <= 0.0 {
            return Err(BinderyError::InvalidGeometry(format!(
                "font size must be positive, got {} pt",
                self.font_size_pt
            )));
        }
        if self.margin_pt < 0.0 || 2.0 * self.margin_pt >= width_pt.min(height_pt) {
            return Err(BinderyError::InvalidGeometry(format!(
                "margin {} pt leaves no content area on a {width_pt}x{height_pt} pt page",
                self.margin_pt
            )));
        }

        Ok(PageGeometry {
            width_pt,
            height_pt,
            margin_pt: self.margin_pt,
            font: self.font,
            font_size_pt: self.font_size_pt,
            show_page_numbers: self.show_page_numbers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves() {
        let geometry = ComposeConfig::default().geometry().unwrap();
        assert!(geometry.width_pt > 0.0);
        assert!(geometry.lines_per_page() > 40);
        assert!(geometry.chars_per_line() > 80);
    }

    #[test]
    fn zero_font_size_is_rejected() {
        let config = ComposeConfig {
            font_size_pt: 0.0,
            ..ComposeConfig::default()
        };
        assert!(matches!(
            config.geometry(),
            Err(BinderyError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn degenerate_custom_paper_is_rejected() {
        let config = ComposeConfig {
            paper_size: PaperSize::Custom {
                width_mm: 0.0,
                height_mm: 100.0,
            },
            ..ComposeConfig::default()
        };
        assert!(matches!(
            config.geometry(),
            Err(BinderyError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let config = ComposeConfig {
            margin_pt: 400.0,
            ..ComposeConfig::default()
        };
        assert!(matches!(
            config.geometry(),
            Err(BinderyError::InvalidGeometry(_))
        ));
    }
}
