// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render request handling — the thin layer between a caller (HTTP handler,
// CLI) and the renderer.
//
// Data fetching sits behind the `DocumentSource` trait so the core never does
// network or storage I/O itself. The handler validates the variant before
// touching the source, so an unsupported variant never costs a lookup.

use std::collections::BTreeMap;

use lembar_core::error::{LembarError, Result};
use lembar_core::{DocumentHeader, DocumentKey, ItemRow, Variant};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::renderer::{DocumentRenderer, RenderedDocument};

/// Everything needed to print one document, already resolved (logo bytes
/// included).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub header: DocumentHeader,
    #[serde(default)]
    pub items: Vec<ItemRow>,
}

/// The data-fetch collaborator.
///
/// Implementations own authorization, tenancy and storage. Returns
/// `LembarError::DocumentNotFound` for an unknown key.
pub trait DocumentSource {
    fn fetch(&self, key: &DocumentKey) -> Result<ResolvedDocument>;
}

/// One incoming request: which document and which print format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub key: DocumentKey,
    /// Raw variant selector as received, e.g. "dot-matrix".
    pub variant: String,
}

impl RenderRequest {
    pub fn new(key: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            key: DocumentKey(key.into()),
            variant: variant.into(),
        }
    }
}

pub struct RenderRequestHandler<S> {
    source: S,
    renderer: DocumentRenderer,
}

impl<S: DocumentSource> RenderRequestHandler<S> {
    pub fn new(source: S, renderer: DocumentRenderer) -> Self {
        Self { source, renderer }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parse the variant, fetch the document, render it.
    #[instrument(skip(self), fields(key = %request.key, variant = %request.variant))]
    pub fn handle(&self, request: &RenderRequest) -> Result<RenderedDocument> {
        let variant: Variant = request.variant.parse()?;
        let resolved = self.source.fetch(&request.key)?;
        let rendered = self
            .renderer
            .render(resolved.items, &resolved.header, variant)?;
        info!(
            key = %request.key,
            filename = %rendered.suggested_filename,
            pages = rendered.page_count,
            "Render request served"
        );
        Ok(rendered)
    }
}

/// A `DocumentSource` over documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: BTreeMap<DocumentKey, ResolvedDocument>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, document: ResolvedDocument) {
        self.documents.insert(DocumentKey(key.into()), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for InMemorySource {
    fn fetch(&self, key: &DocumentKey) -> Result<ResolvedDocument> {
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| LembarError::DocumentNotFound(key.to_string()))
    }
}
