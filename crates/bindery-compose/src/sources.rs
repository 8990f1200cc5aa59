// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source-file helpers: fallback-encoding text reads and file metadata.

use std::path::Path;

use tracing::debug;

use bindery_core::error::Result;

/// Metadata about a source file, tolerant of stat failures.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Base name of the file, lossily decoded.
    pub name: String,
    /// Size in bytes, or `None` if the file could not be stat-ed.
    pub size_bytes: Option<u64>,
}

impl FileInfo {
    /// Gather metadata for `path`. Never fails: a missing or unreadable file
    /// yields `size_bytes: None`.
    pub fn probe(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size_bytes = std::fs::metadata(path).ok().map(|m| m.len());
        Self { name, size_bytes }
    }
}

/// Format a byte count the way the info card displays it: MB with two
/// decimals at or above 1 MiB, otherwise KB.
pub fn human_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MIB {
        format!("{:.2} MB", bytes / MIB)
    } else {
        format!("{:.2} KB", bytes / 1024.0)
    }
}

/// Read a text file, decoding UTF-8 strictly and falling back to
/// Windows-1252 for legacy files.
///
/// Windows-1252 is a superset of Latin-1 and maps every byte, so the
/// fallback always produces a string; only I/O errors are surfaced.
pub fn read_text_with_fallback(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            debug!(
                path = %path.display(),
                "not valid UTF-8, decoded as Windows-1252"
            );
            Ok(decoded.into_owned())
        }
    }
}
