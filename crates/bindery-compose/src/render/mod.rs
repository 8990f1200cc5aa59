// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-category renderers. Each produces a standalone PDF fragment (a
// `PageSet`) for one source item; the assembler stitches the fragments
// together.

pub mod error_page;
pub mod image_page;
pub mod passthrough;
pub mod placeholder;
pub mod tabular;
pub mod text;
