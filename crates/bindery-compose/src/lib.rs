// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bindery-compose — the heterogeneous-document compositor.
//
// Takes an ordered list of source files of arbitrary type and produces one
// paginated PDF containing a rendering of every input, in input order. A
// broken or unsupported file becomes a diagnostic page instead of aborting
// the batch.

pub mod assembler;
pub mod render;
pub mod router;
pub mod sources;

mod draw;
mod merge;

// Re-export the primary entry points so callers can use
// `bindery_compose::DocumentAssembler` etc.
pub use assembler::DocumentAssembler;
pub use router::classify_and_render;
