// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Category router — classifies each input by extension and dispatches to the
// matching renderer, converting any renderer error into a recoverable
// failure outcome.

use std::path::Path;

use tracing::{debug, error, instrument};

use bindery_core::config::TabularOptions;
use bindery_core::error::Result;
use bindery_core::types::{Category, PageGeometry, RenderFailure, RenderOutcome, SourceItem};

use crate::render::{error_page, image_page, passthrough, placeholder, tabular, text};

/// Classify one input and run the renderer for its category.
///
/// Never propagates an error: a renderer failure becomes
/// [`RenderOutcome::Failed`] carrying the path and a human-readable reason.
#[instrument(skip(geometry, tabular_options), fields(path = %path.display()))]
pub fn classify_and_render(
    path: &Path,
    geometry: &PageGeometry,
    tabular_options: &TabularOptions,
) -> RenderOutcome {
    let item = SourceItem::classify(path);
    debug!(category = ?item.category, "source classified");

    let result: Result<RenderOutcome> = match item.category {
        Category::Document => {
            if has_extension(path, "pdf") {
                passthrough::append(path).map(page_set_outcome)
            } else {
                // Word/presentation sub-kinds have no paginated form we can
                // copy, so they get the info card.
                Ok(RenderOutcome::Pages(placeholder::render(path, geometry)))
            }
        }
        Category::Image => image_page::render(path).map(page_set_outcome),
        Category::Text => text::render_file(path, geometry),
        Category::Tabular => {
            tabular::render_file(path, geometry, tabular_options).map(page_set_outcome)
        }
        Category::Binary | Category::Unknown => {
            Ok(RenderOutcome::Pages(placeholder::render(path, geometry)))
        }
    };

    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(%err, "renderer failed, substituting error page");
            RenderOutcome::Failed(RenderFailure {
                source_path: path.to_path_buf(),
                reason: err.to_string(),
            })
        }
    }
}

/// Render the diagnostic page for a failed item. Infallible by contract.
pub(crate) fn render_failure_page(
    failure: &RenderFailure,
    geometry: &PageGeometry,
) -> bindery_core::types::PageSet {
    error_page::render(&failure.source_path, &failure.reason, geometry)
}

fn page_set_outcome(set: bindery_core::types::PageSet) -> RenderOutcome {
    if set.page_count == 0 {
        RenderOutcome::Nothing
    } else {
        RenderOutcome::Pages(set)
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
}
