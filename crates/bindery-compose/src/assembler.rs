// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembler — the orchestrator. Iterates inputs strictly in order,
// dispatches each to the router, accumulates the resulting pages (or one
// error page per failed item), and performs the final atomic write.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use bindery_core::config::{ComposeConfig, TabularOptions};
use bindery_core::error::{BinderyError, Result};
use bindery_core::types::{
    CancelToken, CompositionRun, CompositionSummary, PageGeometry, RenderOutcome,
};

use crate::merge::PageAccumulator;
use crate::router;

/// Composes an ordered list of heterogeneous inputs into one paginated PDF.
///
/// Owns an immutable [`PageGeometry`] snapshot captured at construction, so
/// a run never observes a mid-run configuration change. The pipeline is
/// single-threaded and synchronous; concurrent runs need their own
/// `DocumentAssembler` (they share no mutable state).
pub struct DocumentAssembler {
    geometry: PageGeometry,
    tabular_options: TabularOptions,
}

impl DocumentAssembler {
    /// Resolve a configuration into an assembler.
    pub fn new(config: &ComposeConfig) -> Result<Self> {
        Ok(Self {
            geometry: config.geometry()?,
            tabular_options: config.tabular,
        })
    }

    /// Build from an already-resolved geometry.
    pub fn with_geometry(geometry: PageGeometry, tabular_options: TabularOptions) -> Self {
        Self {
            geometry,
            tabular_options,
        }
    }

    /// The geometry snapshot this assembler renders against.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Compose `inputs` into a single PDF at `destination`.
    pub fn compose(&self, inputs: &[PathBuf], destination: &Path) -> Result<CompositionSummary> {
        self.compose_with_cancel(inputs, destination, &CancelToken::new())
    }

    /// Compose with cooperative cancellation, checked once per input item.
    ///
    /// Page order in the output is the depth-first concatenation of
    /// (input order) x (pages per input). An item-level render failure
    /// contributes exactly one diagnostic page and the run continues; only
    /// an empty input list, cancellation, or a destination write failure
    /// abort the run — and an aborted run writes nothing.
    #[instrument(skip_all, fields(inputs = inputs.len(), destination = %destination.display()))]
    pub fn compose_with_cancel(
        &self,
        inputs: &[PathBuf],
        destination: &Path,
        cancel: &CancelToken,
    ) -> Result<CompositionSummary> {
        let mut run = CompositionRun::new();

        if inputs.is_empty() {
            // Configuration error: the run never starts and no output file
            // is produced.
            run.fail();
            return Err(BinderyError::NoInputs);
        }

        run.begin();
        info!(run_id = %run.id, "composition started");

        let mut accumulator = PageAccumulator::new();
        let mut succeeded: usize = 0;
        let mut failed: usize = 0;

        for path in inputs {
            if cancel.is_cancelled() {
                run.fail();
                info!(run_id = %run.id, "composition cancelled");
                return Err(BinderyError::Cancelled);
            }

            match router::classify_and_render(path, &self.geometry, &self.tabular_options) {
                RenderOutcome::Pages(set) => match accumulator.append_fragment(&set.pdf_bytes) {
                    Ok(_) => succeeded += 1,
                    Err(err) => {
                        // The fragment came back unreadable; keep the batch
                        // moving with a diagnostic page, like any other
                        // item-level failure.
                        warn!(path = %path.display(), %err, "fragment rejected by accumulator");
                        self.append_error_page(&mut accumulator, path, &err.to_string());
                        failed += 1;
                    }
                },
                RenderOutcome::Nothing => succeeded += 1,
                RenderOutcome::Failed(failure) => {
                    self.append_error_page(&mut accumulator, path, &failure.reason);
                    failed += 1;
                }
            }
        }

        let bytes = match accumulator.save_to_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                run.fail();
                return Err(err);
            }
        };
        if let Err(err) = write_atomically(destination, &bytes) {
            run.fail();
            return Err(err);
        }

        run.complete();
        let summary = CompositionSummary {
            produced_page_count: accumulator.page_count(),
            succeeded_count: succeeded,
            failed_count: failed,
        };
        info!(
            run_id = %run.id,
            pages = summary.produced_page_count,
            succeeded,
            failed,
            "composition completed"
        );
        Ok(summary)
    }

    /// Substitute one diagnostic page for a failed item. By contract this
    /// never aborts the run; an unappendable error page is a defect and is
    /// logged rather than propagated.
    fn append_error_page(&self, accumulator: &mut PageAccumulator, path: &Path, reason: &str) {
        let failure = bindery_core::types::RenderFailure {
            source_path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        let page = router::render_failure_page(&failure, &self.geometry);
        if let Err(err) = accumulator.append_fragment(&page.pdf_bytes) {
            warn!(path = %path.display(), %err, "could not append error page");
        }
    }
}

/// Write bytes to `destination` through a temporary file in the same
/// directory, renaming into place. An interrupted write never leaves a
/// readable partial file at the destination; an existing file is replaced.
fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(destination)
        .map_err(|err| BinderyError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn assembler() -> DocumentAssembler {
        DocumentAssembler::new(&ComposeConfig::default()).unwrap()
    }

    fn output_page_count(path: &Path) -> usize {
        let doc = lopdf::Document::load(path).unwrap();
        doc.get_pages().len()
    }

    #[test]
    fn mixed_batch_produces_one_page_per_renderable_unit() {
        // The worked example: a 100x200 image, a two-line text file, and a
        // binary, in that order -> three pages.
        let dir = tempfile::tempdir().unwrap();

        let a = dir.path().join("a.png");
        RgbImage::from_pixel(100, 200, Rgb([0u8, 128, 255]))
            .save(&a)
            .unwrap();
        let b = dir.path().join("b.txt");
        std::fs::write(&b, "hello\nworld").unwrap();
        let c = dir.path().join("c.exe");
        std::fs::write(&c, b"MZ\x00\x01").unwrap();

        let destination = dir.path().join("out.pdf");
        let summary = assembler()
            .compose(&[a, b, c], &destination)
            .unwrap();

        assert_eq!(summary.produced_page_count, 3);
        assert_eq!(summary.succeeded_count, 3);
        assert_eq!(summary.failed_count, 0);
        assert_eq!(output_page_count(&destination), 3);
    }

    #[test]
    fn one_broken_item_is_isolated_to_one_error_page() {
        let dir = tempfile::tempdir().unwrap();

        let good1 = dir.path().join("one.txt");
        std::fs::write(&good1, "first").unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"not pixels").unwrap();
        let good2 = dir.path().join("two.txt");
        std::fs::write(&good2, "second").unwrap();

        let destination = dir.path().join("out.pdf");
        let summary = assembler()
            .compose(&[good1, broken, good2], &destination)
            .unwrap();

        assert_eq!(summary.succeeded_count, 2);
        assert_eq!(summary.failed_count, 1);
        // One page per text file plus exactly one diagnostic page.
        assert_eq!(summary.produced_page_count, 3);
        assert_eq!(output_page_count(&destination), 3);
    }

    #[test]
    fn page_order_follows_input_order_page_counts() {
        let dir = tempfile::tempdir().unwrap();
        let geometry = assembler().geometry;
        let lines_per_page = geometry.lines_per_page();

        // First input paginates to two pages, second to one.
        let long = dir.path().join("long.txt");
        let content: String = (0..lines_per_page + 1).map(|i| format!("{i}\n")).collect();
        std::fs::write(&long, content).unwrap();
        let short = dir.path().join("short.txt");
        std::fs::write(&short, "only line").unwrap();

        let destination = dir.path().join("out.pdf");
        let summary = assembler().compose(&[long, short], &destination).unwrap();

        assert_eq!(summary.produced_page_count, 2 + 1);
        assert_eq!(output_page_count(&destination), 3);
    }

    #[test]
    fn empty_input_list_is_rejected_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("never.pdf");

        let result = assembler().compose(&[], &destination);
        assert!(matches!(result, Err(BinderyError::NoInputs)));
        assert!(!destination.exists());
    }

    #[test]
    fn cancellation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.txt");
        std::fs::write(&input, "content").unwrap();
        let destination = dir.path().join("out.pdf");

        let cancel = CancelToken::new();
        cancel.cancel();
        let result = assembler().compose_with_cancel(&[input], &destination, &cancel);

        assert!(matches!(result, Err(BinderyError::Cancelled)));
        assert!(!destination.exists());
    }

    #[test]
    fn existing_destination_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.txt");
        std::fs::write(&input, "fresh content").unwrap();
        let destination = dir.path().join("out.pdf");
        std::fs::write(&destination, b"stale bytes").unwrap();

        assembler().compose(&[input], &destination).unwrap();
        assert_eq!(output_page_count(&destination), 1);
    }

    #[test]
    fn unwritable_destination_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.txt");
        std::fs::write(&input, "content").unwrap();
        let destination = dir.path().join("missing-subdir").join("out.pdf");

        let result = assembler().compose(&[input], &destination);
        assert!(matches!(result, Err(BinderyError::Io(_))));
        assert!(!destination.exists());
    }

    #[test]
    fn empty_text_inputs_count_as_successes_without_pages() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").unwrap();
        let real = dir.path().join("real.txt");
        std::fs::write(&real, "text").unwrap();

        let destination = dir.path().join("out.pdf");
        let summary = assembler().compose(&[empty, real], &destination).unwrap();

        assert_eq!(summary.succeeded_count, 2);
        assert_eq!(summary.failed_count, 0);
        assert_eq!(summary.produced_page_count, 1);
    }
}
