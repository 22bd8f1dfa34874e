// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lembar-layout — Pagination and page composition for fixed-schema documents.
//
// Provides the per-variant layout constants, the item chunker, the signature
// block builder and the page composers for the standard and dot-matrix
// variants. Everything here is pure computation over already-resolved data;
// PDF emission lives in `lembar-render`.

pub mod chunk;
pub mod compose;
pub mod config;
pub mod metrics;
pub mod signature;

pub use chunk::{PageChunk, chunk, order_items, page_count};
pub use compose::{ComposedPage, Element, ElementKind, PageComposer, Region};
pub use config::LayoutConfig;
pub use signature::{SignatureBlock, SignatureBlockBuilder};
