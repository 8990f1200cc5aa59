// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bindery document compositor.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a composition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of a composition run.
///
/// A run moves `Idle → Running → {Completed, Failed}`; terminal states are
/// not resumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Created, inputs not yet accepted.
    Idle,
    /// Iterating the input list.
    Running,
    /// Output written to the destination.
    Completed,
    /// Run aborted — no output was written.
    Failed,
}

/// Record of a single composition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionRun {
    pub id: RunId,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CompositionRun {
    pub fn new() -> Self {
        Self {
            id: RunId::new(),
            state: RunState::Idle,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Transition `Idle → Running` once the input list has been accepted.
    pub fn begin(&mut self) {
        self.state = RunState::Running;
        self.started_at = Utc::now();
    }

    pub fn complete(&mut self) {
        self.state = RunState::Completed;
        self.finished_at = Some(Utc::now());
    }

    pub fn fail(&mut self) {
        self.state = RunState::Failed;
        self.finished_at = Some(Utc::now());
    }
}

impl Default for CompositionRun {
    fn default() -> Self {
        Self::new()
    }
}

/// File category driving renderer dispatch.
///
/// Classification is a pure function of the file extension; adding a category
/// requires updating the router's exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Existing paginated or office document formats.
    Document,
    /// Raster image formats.
    Image,
    /// Plain text, markup, and source code.
    Text,
    /// Spreadsheet formats with materialized cell values.
    Tabular,
    /// Archives and executables.
    Binary,
    /// Anything else.
    Unknown,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "gif", "tiff", "tif", "webp", "ico",
];

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "json", "xml", "log", "ini", "yaml", "yml", // plain/markup
    "html", "htm", "css", "js", "php", "asp", "jsx", "ts", // web
    "py", "java", "c", "cpp", "h", "cs", "go", "rs", "sh", "bat", "sql", // code
];

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "odt", "pptx", "ppt"];

const TABULAR_EXTENSIONS: &[&str] = &["xlsx", "xls", "ods"];

const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "msi", "bin", "dll", // executables
    "zip", "rar", "7z", "tar", "gz", // archives
];

impl Category {
    /// Classify a path by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_ascii_lowercase(),
            None => return Self::Unknown,
        };
        let ext = ext.as_str();

        if IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else if TEXT_EXTENSIONS.contains(&ext) {
            Self::Text
        } else if DOCUMENT_EXTENSIONS.contains(&ext) {
            Self::Document
        } else if TABULAR_EXTENSIONS.contains(&ext) {
            Self::Tabular
        } else if BINARY_EXTENSIONS.contains(&ext) {
            Self::Binary
        } else {
            Self::Unknown
        }
    }

    /// Whether the compositor has a dedicated renderer for this path.
    ///
    /// `Unknown` files are still accepted (they get a placeholder page), so
    /// this is advisory for callers that want to pre-filter input lists.
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path) != Self::Unknown
    }
}

/// A classified input file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    pub path: PathBuf,
    pub category: Category,
}

impl SourceItem {
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let category = Category::from_path(&path);
        Self { path, category }
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (216.0, 279.0),
            Self::Legal => (216.0, 356.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PostScript points (width, height). 1 pt = 1/72 in.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        (w_mm * 72.0 / 25.4, h_mm * 72.0 / 25.4)
    }
}

/// Font families available to the drawn renderers.
///
/// These map onto the PDF base-14 fonts, so no font files are embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    Courier,
    TimesRoman,
}

/// Resolved numeric layout parameters governing one compositor run.
///
/// Captured once per run from [`crate::config::ComposeConfig`] and passed to
/// every renderer by reference; never mutated mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub font: FontFamily,
    pub font_size_pt: f32,
    pub show_page_numbers: bool,
}

/// Estimated average glyph width as a fraction of the font size.
/// Roughly right for Helvetica; the drawn renderers only need a character
/// budget, not exact metrics.
const AVG_GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// Baseline-to-baseline distance as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.3;

impl PageGeometry {
    /// Baseline-to-baseline line height in points.
    pub fn line_height_pt(&self) -> f32 {
        self.font_size_pt * LINE_HEIGHT_FACTOR
    }

    /// Width of the content area between the margins, in points.
    pub fn content_width_pt(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    /// Character budget for one physical line, derived from the page width
    /// and font size. Always at least 1.
    pub fn chars_per_line(&self) -> usize {
        let per_char = self.font_size_pt * AVG_GLYPH_WIDTH_FACTOR;
        ((self.content_width_pt() / per_char) as usize).max(1)
    }

    /// Content lines that fit between the margins. Always at least 1.
    ///
    /// The file-name header sits in the top margin band, so the full
    /// inter-margin height is available for content.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.height_pt - 2.0 * self.margin_pt;
        ((usable / self.line_height_pt()) as usize).max(1)
    }
}

/// One item's rendered pages: a serialized PDF fragment plus its page count.
///
/// Renderers draw into an in-memory document and hand the bytes to the
/// assembler, which copies the pages into the output accumulator. The
/// fragment's internal page order is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet {
    pub pdf_bytes: Vec<u8>,
    pub page_count: usize,
}

/// Structured per-item failure, recovered locally by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub source_path: PathBuf,
    pub reason: String,
}

/// The per-item result of classification and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// One or more pages to append.
    Pages(PageSet),
    /// The item produced no content (e.g. an empty text file); counts as a
    /// success but adds nothing to the output.
    Nothing,
    /// The renderer failed; the assembler substitutes one error page.
    Failed(RenderFailure),
}

/// Informational summary returned to the caller after a completed run.
/// Never affects output page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSummary {
    pub produced_page_count: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

/// Cooperative cancellation flag, checked once per input item.
///
/// Clones share the same flag, so a caller can keep one handle and pass the
/// other into the run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
