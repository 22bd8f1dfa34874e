// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lembar-render — Turns composed pages into a print-ready PDF.
//
// Provides the document renderer (chunk, compose, emit with `printpdf`), the
// `lopdf` canonicalisation pass that makes output byte-identical across runs,
// logo decoding, and the render request handler that sits between the HTTP
// layer and the data-fetch collaborator.

pub mod handler;
pub mod integrity;
pub mod logo;
pub mod pdf;
pub mod renderer;

pub use handler::{
    DocumentSource, InMemorySource, RenderRequest, RenderRequestHandler, ResolvedDocument,
};
pub use logo::LogoImage;
pub use pdf::PdfWriter;
pub use renderer::{DocumentRenderer, RenderedDocument, suggested_filename};
