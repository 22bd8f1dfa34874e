// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — emitting composed pages and canonicalising the result.

pub mod canonical;
pub mod writer;

pub use canonical::canonicalize;
pub use writer::PdfWriter;
