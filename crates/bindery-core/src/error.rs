// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bindery.

use thiserror::Error;

/// Top-level error type for all Bindery operations.
#[derive(Debug, Error)]
pub enum BinderyError {
    // -- Item-level render errors --
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("spreadsheet parsing failed: {0}")]
    SpreadsheetError(String),

    // -- Run-level errors --
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("composition requires at least one input file")]
    NoInputs,

    #[error("composition cancelled before completion")]
    Cancelled,

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BinderyError>;
