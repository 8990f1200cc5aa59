// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Passthrough appender — copies pages from an already-paginated source
// document verbatim, with no re-rendering.

use std::path::Path;

use tracing::{debug, instrument};

use bindery_core::error::{BinderyError, Result};
use bindery_core::types::PageSet;

/// Open an existing PDF and return its bytes as the fragment.
///
/// The document is parsed once here to validate it and count its pages; the
/// assembler copies the pages into the output in their original order. A
/// corrupt or unreadable document is a renderer-level failure.
#[instrument(fields(path = %path.display()))]
pub fn append(path: &Path) -> Result<PageSet> {
    let bytes = std::fs::read(path)?;

    let document = lopdf::Document::load_mem(&bytes).map_err(|err| {
        BinderyError::PdfError(format!("failed to read {}: {err}", path.display()))
    })?;
    let page_count = document.get_pages().len();

    debug!(page_count, "source document opened for passthrough");
    Ok(PageSet {
        pdf_bytes: bytes,
        page_count,
    })
}
