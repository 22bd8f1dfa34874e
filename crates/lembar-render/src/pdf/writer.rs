// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — emit composed pages as PDF operations using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: each `ComposedPage` becomes one
// `PdfPage` holding a `Vec<Op>`, and the document is serialised via
// `PdfDocument::save()`. Composed coordinates are millimetres from the page's
// top-left corner; PDF user space is points from the bottom-left, so every
// y coordinate is flipped here and nowhere else.

use lembar_core::error::{LembarError, Result};
use lembar_layout::compose::{ComposedPage, ElementKind, TextRun};
use lembar_layout::config::{LayoutConfig, Rect};
use lembar_layout::metrics::Face;
use printpdf::{
    BuiltinFont, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Pt, TextItem, XObjectId,
};
use tracing::{debug, info, instrument, warn};

use crate::logo::LogoImage;

/// Writes composed pages of one layout into a PDF document.
pub struct PdfWriter {
    page_height_mm: f32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            page_height_mm: layout.page_height_mm,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Serialise `pages` in order. The logo, when given, is embedded once and
    /// drawn wherever a page carries a logo element.
    #[instrument(skip(self, pages, logo), fields(pages = pages.len(), has_logo = logo.is_some()))]
    pub fn write(&self, pages: &[ComposedPage], logo: Option<&LogoImage>) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(LembarError::PdfError("a document needs at least one page".into()));
        }
        let title = self.title.as_deref().unwrap_or("Lembar Document");
        let mut doc = PdfDocument::new(title);
        let logo_xobject = logo.map(|image| (doc.add_image(&image.to_raw_image()), image));

        let pdf_pages: Vec<PdfPage> = pages
            .iter()
            .map(|page| {
                let ops = self.page_ops(page, logo_xobject.as_ref());
                PdfPage::new(Mm(page.width_mm), Mm(page.height_mm), ops)
            })
            .collect();
        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        info!(title, pages = pages.len(), bytes = output.len(), "PDF written");
        Ok(output)
    }

    fn page_ops(&self, page: &ComposedPage, logo: Option<&(XObjectId, &LogoImage)>) -> Vec<Op> {
        let mut ops: Vec<Op> = Vec::new();
        for element in &page.elements {
            match &element.kind {
                ElementKind::Text(run) => self.text_ops(run, &mut ops),
                ElementKind::Rule {
                    from,
                    to,
                    thickness_pt,
                } => {
                    ops.push(Op::SetOutlineThickness { pt: Pt(*thickness_pt) });
                    ops.push(Op::DrawLine {
                        line: Line {
                            points: vec![self.point(from.0, from.1), self.point(to.0, to.1)],
                            is_closed: false,
                        },
                    });
                }
                ElementKind::Frame { rect, thickness_pt } => {
                    ops.push(Op::SetOutlineThickness { pt: Pt(*thickness_pt) });
                    ops.push(Op::DrawLine {
                        line: Line {
                            points: self.corners(rect),
                            is_closed: true,
                        },
                    });
                }
                ElementKind::Logo { rect } => match logo {
                    Some((id, image)) => ops.push(Op::UseXobject {
                        id: id.clone(),
                        transform: image.fit_transform(rect, self.page_height_mm),
                    }),
                    None => debug!(page = page.page_index + 1, "No decoded logo, box left empty"),
                },
            }
        }
        ops
    }

    fn text_ops(&self, run: &TextRun, ops: &mut Vec<Op>) {
        let font = builtin_font(run.face);
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Mm(run.x_mm).into_pt(),
                y: self.flip(run.baseline_mm),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(run.size_pt),
            font,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(run.text.clone())],
            font,
        });
        ops.push(Op::EndTextSection);
    }

    /// Page-top millimetres to page-bottom points.
    fn flip(&self, y_mm: f32) -> Pt {
        Mm(self.page_height_mm - y_mm).into_pt()
    }

    fn point(&self, x_mm: f32, y_mm: f32) -> LinePoint {
        LinePoint {
            p: Point {
                x: Mm(x_mm).into_pt(),
                y: self.flip(y_mm),
            },
            bezier: false,
        }
    }

    fn corners(&self, rect: &Rect) -> Vec<LinePoint> {
        let (left, top) = (rect.x_mm, rect.y_mm);
        let (right, bottom) = (rect.right_mm(), rect.bottom_mm());
        vec![
            self.point(left, top),
            self.point(right, top),
            self.point(right, bottom),
            self.point(left, bottom),
        ]
    }
}

fn builtin_font(face: Face) -> BuiltinFont {
    match face {
        Face::Helvetica => BuiltinFont::Helvetica,
        Face::HelveticaBold => BuiltinFont::HelveticaBold,
        Face::Courier => BuiltinFont::Courier,
        Face::CourierBold => BuiltinFont::CourierBold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lembar_core::Variant;
    use lembar_layout::compose::{Element, Region};

    fn page(layout: &LayoutConfig, elements: Vec<Element>) -> ComposedPage {
        ComposedPage {
            page_index: 0,
            total_pages: 1,
            width_mm: layout.page_width_mm,
            height_mm: layout.page_height_mm,
            elements,
        }
    }

    fn text(x_mm: f32, baseline_mm: f32, value: &str) -> Element {
        Element::text(
            Region::Header,
            TextRun {
                x_mm,
                baseline_mm,
                size_pt: 9.0,
                face: Face::Helvetica,
                text: value.into(),
            },
        )
    }

    #[test]
    fn empty_page_list_is_rejected() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let err = PdfWriter::new(&layout).write(&[], None).unwrap_err();
        assert!(matches!(err, LembarError::PdfError(_)));
    }

    #[test]
    fn writes_one_pdf_page_per_composed_page() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let pages = vec![
            page(&layout, vec![text(10.0, 10.0, "one")]),
            page(&layout, vec![text(10.0, 10.0, "two")]),
        ];
        let bytes = PdfWriter::new(&layout).write(&pages, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn y_axis_is_flipped() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let writer = PdfWriter::new(&layout);
        assert!((writer.flip(0.0).0 - 396.0).abs() < 0.1);
        assert!(writer.flip(layout.page_height_mm).0.abs() < 0.001);
    }

    #[test]
    fn logo_element_without_image_draws_nothing() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let writer = PdfWriter::new(&layout);
        let logo_only = page(
            &layout,
            vec![Element {
                region: Region::Header,
                kind: ElementKind::Logo {
                    rect: layout.logo_box,
                },
            }],
        );
        assert!(writer.page_ops(&logo_only, None).is_empty());
    }

    #[test]
    fn frame_is_a_closed_four_corner_path() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let writer = PdfWriter::new(&layout);
        let framed = page(
            &layout,
            vec![Element {
                region: Region::Table,
                kind: ElementKind::Frame {
                    rect: layout.logo_box,
                    thickness_pt: 0.5,
                },
            }],
        );
        let ops = writer.page_ops(&framed, None);
        let line = ops.iter().find_map(|op| match op {
            Op::DrawLine { line } => Some(line),
            _ => None,
        });
        let line = line.unwrap();
        assert!(line.is_closed);
        assert_eq!(line.points.len(), 4);
    }
}
