// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document renderer — orders items, chunks them, composes one page per chunk
// and emits a canonical PDF.
//
// Rendering is pure and synchronous. All data (including logo bytes) is
// resolved before `render` is called, and the renderer holds only the
// read-only template, so one instance can serve concurrent requests.

use lembar_core::error::{LembarError, Result};
use lembar_core::{DocumentHeader, ItemRow, RenderWarning, SignatureParty, TemplateConfig, Variant};
use lembar_layout::{ComposedPage, LayoutConfig, PageComposer, chunk, order_items};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::integrity::hash_bytes;
use crate::logo::LogoImage;
use crate::pdf::{PdfWriter, canonicalize};

pub const MEDIA_TYPE_PDF: &str = "application/pdf";

/// The finished artifact of one render request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub suggested_filename: String,
    pub page_count: usize,
    /// Hex SHA-256 of `bytes`.
    pub sha256: String,
    /// Data-quality gaps that were printed as placeholders.
    pub warnings: Vec<RenderWarning>,
    pub variant: Variant,
}

/// Renders documents with one template.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    template: TemplateConfig,
}

impl DocumentRenderer {
    /// Create a renderer, rejecting a template that cannot print.
    pub fn new(template: TemplateConfig) -> Result<Self> {
        template.validate()?;
        Ok(Self { template })
    }

    pub fn template(&self) -> &TemplateConfig {
        &self.template
    }

    /// Compose every page of a document from already-ordered items.
    pub fn compose(
        &self,
        items: &[ItemRow],
        header: &DocumentHeader,
        variant: Variant,
        parties: &[SignatureParty],
    ) -> Result<Vec<ComposedPage>> {
        let layout = LayoutConfig::for_variant(variant);
        let chunks = chunk(items, layout.rows_per_page)?;
        let total_pages = chunks.len();
        let composer = PageComposer::new(&layout, &self.template.labels);

        let mut pages = Vec::with_capacity(total_pages);
        for (expected, page_chunk) in chunks.iter().enumerate() {
            if page_chunk.page_index != expected {
                return Err(LembarError::PageOutOfSequence {
                    expected,
                    actual: page_chunk.page_index,
                });
            }
            pages.push(composer.compose(page_chunk, header, parties, total_pages)?);
        }
        Ok(pages)
    }

    /// Render with the template's signature parties for `variant`.
    pub fn render(
        &self,
        items: Vec<ItemRow>,
        header: &DocumentHeader,
        variant: Variant,
    ) -> Result<RenderedDocument> {
        let parties = self.template.signatures.parties(variant).to_vec();
        self.render_with_parties(items, header, variant, &parties)
    }

    /// Render a complete document.
    ///
    /// Items are put in print order first. Missing header fields, an
    /// unparsable date and an undecodable logo are reported as warnings and
    /// never fail the render.
    #[instrument(
        skip_all,
        fields(variant = %variant, number = %header.number, items = items.len())
    )]
    pub fn render_with_parties(
        &self,
        items: Vec<ItemRow>,
        header: &DocumentHeader,
        variant: Variant,
        parties: &[SignatureParty],
    ) -> Result<RenderedDocument> {
        let items = order_items(items);
        let mut warnings = header_warnings(header);

        let mut header = header.clone();
        let decoded = header
            .organization
            .logo
            .as_deref()
            .filter(|bytes| !bytes.is_empty())
            .map(LogoImage::decode);
        let logo = match decoded {
            Some(Ok(logo)) => Some(logo),
            Some(Err(err)) => {
                warnings.push(RenderWarning::LogoUndecodable {
                    reason: err.to_string(),
                });
                // No box is reserved for a logo that cannot be drawn.
                header.organization.logo = None;
                None
            }
            None => None,
        };
        for warning in &warnings {
            warn!(%warning, "Printing placeholder");
        }

        let pages = self.compose(&items, &header, variant, parties)?;

        let layout = LayoutConfig::for_variant(variant);
        let mut writer = PdfWriter::new(&layout);
        writer.set_title(format!(
            "{} {}",
            self.template.labels.title(header.kind),
            header.number.trim()
        ));
        let written = writer.write(&pages, logo.as_ref())?;
        let bytes = canonicalize(&written)?;
        debug!(raw = written.len(), canonical = bytes.len(), "PDF canonicalised");

        let rendered = RenderedDocument {
            sha256: hash_bytes(&bytes),
            bytes,
            media_type: MEDIA_TYPE_PDF,
            suggested_filename: suggested_filename(&header),
            page_count: pages.len(),
            warnings,
            variant,
        };
        info!(
            pages = rendered.page_count,
            bytes = rendered.bytes.len(),
            warnings = rendered.warnings.len(),
            filename = %rendered.suggested_filename,
            "Document rendered"
        );
        Ok(rendered)
    }
}

fn header_warnings(header: &DocumentHeader) -> Vec<RenderWarning> {
    let mut warnings: Vec<RenderWarning> = header
        .missing_fields()
        .into_iter()
        .map(|field| RenderWarning::MissingHeaderField { field })
        .collect();
    let raw_date = header.date.as_deref().filter(|d| !d.trim().is_empty());
    if let (Some(raw), None) = (raw_date, header.document_date()) {
        warnings.push(RenderWarning::UnparsableDate { raw: raw.to_string() });
    }
    warnings
}

/// `<kind prefix>-<document number>.pdf`, with the number reduced to
/// filename-safe characters.
pub fn suggested_filename(header: &DocumentHeader) -> String {
    let prefix = header.kind.file_prefix();
    let mut safe = String::with_capacity(header.number.len());
    for ch in header.number.trim().chars() {
        let ch = if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
            ch
        } else {
            '-'
        };
        if ch == '-' && safe.ends_with('-') {
            continue;
        }
        safe.push(ch);
    }
    let safe = safe.trim_matches(|c| c == '-' || c == '.');
    if safe.is_empty() {
        format!("{prefix}.pdf")
    } else {
        format!("{prefix}-{safe}.pdf")
    }
}
