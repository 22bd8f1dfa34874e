// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page composition — turns one chunk plus the document header into the
// drawable content of one page.
//
// Every page carries the header block and the page indicator. The item table
// region is reserved in full even when the chunk is short. The signature block
// is emitted on the last page only.

mod dot_matrix;
mod standard;

use lembar_core::error::{LembarError, Result};
use lembar_core::{DocumentHeader, Labels, SignatureParty, Variant};
use serde::Serialize;
use tracing::debug;

use crate::chunk::PageChunk;
use crate::config::{LayoutConfig, Rect};
use crate::metrics::Face;
use crate::signature::SignatureBlockBuilder;

/// Which part of the page an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Header,
    Table,
    Signature,
    Footer,
}

/// A single line of text. `baseline_mm` is measured from the page top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x_mm: f32,
    pub baseline_mm: f32,
    pub size_pt: f32,
    pub face: Face,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Text(TextRun),
    /// Straight stroke between two points.
    Rule {
        from: (f32, f32),
        to: (f32, f32),
        thickness_pt: f32,
    },
    /// Stroked rectangle outline.
    Frame { rect: Rect, thickness_pt: f32 },
    /// Placement box for the organization logo.
    Logo { rect: Rect },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub region: Region,
    pub kind: ElementKind,
}

impl Element {
    pub fn text(region: Region, run: TextRun) -> Self {
        Self {
            region,
            kind: ElementKind::Text(run),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(run) => Some(&run.text),
            _ => None,
        }
    }
}

/// The drawable content of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedPage {
    pub page_index: usize,
    pub total_pages: usize,
    pub width_mm: f32,
    pub height_mm: f32,
    pub elements: Vec<Element>,
}

impl ComposedPage {
    pub fn region(&self, region: Region) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.region == region)
    }

    /// Text of every run in `region`, in drawing order.
    pub fn texts(&self, region: Region) -> Vec<&str> {
        self.region(region).filter_map(Element::as_text).collect()
    }

    pub fn has_signature_block(&self) -> bool {
        self.region(Region::Signature).next().is_some()
    }

    pub fn has_logo(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e.kind, ElementKind::Logo { .. }))
    }
}

/// Header strings after placeholder substitution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HeaderText {
    pub title: String,
    pub org_name: String,
    pub org_address: String,
    pub org_phone: String,
    pub org_email: String,
    pub number: String,
    pub date: String,
    pub source_number: String,
    pub counterpart: String,
    pub has_logo: bool,
}

impl HeaderText {
    pub fn resolve(header: &DocumentHeader, labels: &Labels) -> Self {
        let org = &header.organization;
        let date = header
            .document_date()
            .map(|d| labels.format_date(d))
            .unwrap_or_else(|| labels.placeholder.clone());
        Self {
            title: labels.title(header.kind).to_string(),
            org_name: labels.or_placeholder(org.name.as_deref()).to_string(),
            org_address: labels.or_placeholder(org.address.as_deref()).to_string(),
            org_phone: labels.or_placeholder(org.phone.as_deref()).to_string(),
            org_email: labels.or_placeholder(org.email.as_deref()).to_string(),
            number: labels.or_placeholder(Some(&header.number)).to_string(),
            date,
            source_number: labels
                .or_placeholder(header.source.document_number.as_deref())
                .to_string(),
            counterpart: labels
                .or_placeholder(header.source.counterpart_name.as_deref())
                .to_string(),
            has_logo: org.logo.as_ref().is_some_and(|bytes| !bytes.is_empty()),
        }
    }

    /// Caption/value pairs printed in the right-hand header column.
    pub fn identity_lines<'a>(&'a self, labels: &'a Labels) -> [(&'a str, &'a str); 4] {
        [
            (labels.document_number.as_str(), self.number.as_str()),
            (labels.document_date.as_str(), self.date.as_str()),
            (labels.source_reference.as_str(), self.source_number.as_str()),
            (labels.counterpart.as_str(), self.counterpart.as_str()),
        ]
    }

    pub fn contact_line(&self, labels: &Labels) -> String {
        format!(
            "{}: {}  {}: {}",
            labels.phone, self.org_phone, labels.email, self.org_email
        )
    }
}

/// Composes pages for one variant with one set of labels.
///
/// Holds only shared, read-only inputs; composing never mutates the chunk,
/// the header, or the layout.
pub struct PageComposer<'a> {
    layout: &'a LayoutConfig,
    labels: &'a Labels,
}

impl<'a> PageComposer<'a> {
    pub fn new(layout: &'a LayoutConfig, labels: &'a Labels) -> Self {
        Self { layout, labels }
    }

    /// Compose one page.
    ///
    /// Missing header fields print as the placeholder. A chunk that breaks
    /// the pagination contract is rejected as a caller bug, and so is a last
    /// page with no party to sign.
    pub fn compose(
        &self,
        chunk: &PageChunk<'_>,
        header: &DocumentHeader,
        parties: &[SignatureParty],
        total_pages: usize,
    ) -> Result<ComposedPage> {
        self.check_chunk(chunk, total_pages)?;

        let text = HeaderText::resolve(header, self.labels);
        let signature = if chunk.is_last_page {
            Some(SignatureBlockBuilder::new(self.layout).build(parties)?)
        } else {
            None
        };

        let (layout, labels, signature) = (self.layout, self.labels, signature.as_ref());
        let elements = match layout.variant {
            Variant::Standard => {
                standard::elements(layout, labels, &text, chunk, signature, total_pages)
            }
            Variant::DotMatrix => {
                dot_matrix::elements(layout, labels, &text, chunk, signature, total_pages)
            }
        };

        debug!(
            variant = %self.layout.variant,
            page = chunk.page_index + 1,
            total_pages,
            rows = chunk.len(),
            elements = elements.len(),
            signature = chunk.is_last_page,
            "Page composed"
        );

        Ok(ComposedPage {
            page_index: chunk.page_index,
            total_pages,
            width_mm: self.layout.page_width_mm,
            height_mm: self.layout.page_height_mm,
            elements,
        })
    }

    fn check_chunk(&self, chunk: &PageChunk<'_>, total_pages: usize) -> Result<()> {
        let capacity = self.layout.rows_per_page;
        if capacity == 0 {
            return Err(LembarError::InvalidCapacity { capacity });
        }
        if chunk.len() > capacity {
            return Err(LembarError::MalformedChunk(format!(
                "page {} holds {} rows but the {} layout fits {}",
                chunk.page_index,
                chunk.len(),
                self.layout.variant,
                capacity
            )));
        }
        if chunk.page_index >= total_pages {
            return Err(LembarError::MalformedChunk(format!(
                "page index {} is outside a {}-page document",
                chunk.page_index, total_pages
            )));
        }
        if chunk.is_first_page != (chunk.page_index == 0) {
            return Err(LembarError::MalformedChunk(format!(
                "page {} has a wrong first-page flag",
                chunk.page_index
            )));
        }
        if chunk.is_last_page != (chunk.page_index + 1 == total_pages) {
            return Err(LembarError::MalformedChunk(format!(
                "page {} of {} has a wrong last-page flag",
                chunk.page_index, total_pages
            )));
        }
        // Row numbers are 1-based; a chunk cut at a smaller capacity is fine.
        if chunk.first_row_number == 0 {
            return Err(LembarError::MalformedChunk(format!(
                "page {} starts at row 0",
                chunk.page_index
            )));
        }
        Ok(())
    }
}
