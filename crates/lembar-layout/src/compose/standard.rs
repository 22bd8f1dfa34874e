// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standard (laser) page rules: proportional Helvetica, vector rules, a framed
// item table with column separators.

use lembar_core::Labels;

use super::{Element, ElementKind, HeaderText, Region, TextRun};
use crate::chunk::PageChunk;
use crate::config::{Align, Column, LayoutConfig, Rect};
use crate::metrics::{Face, aligned_x, fit_to_width};
use crate::signature::SignatureBlock;

/// Inner padding of a table cell.
const CELL_PADDING_MM: f32 = 1.5;
/// Where the right-hand identity captions start.
const IDENTITY_CAPTION_X_MM: f32 = 140.0;
const IDENTITY_VALUE_X_MM: f32 = 161.0;
/// Baseline sits at this fraction of a row's height.
const BASELINE_RATIO: f32 = 0.72;

const HEAVY_PT: f32 = 0.8;
const LIGHT_PT: f32 = 0.5;

pub(super) fn elements(
    layout: &LayoutConfig,
    labels: &Labels,
    text: &HeaderText,
    chunk: &PageChunk<'_>,
    signature: Option<&SignatureBlock>,
    total_pages: usize,
) -> Vec<Element> {
    let mut out = Vec::new();
    header(layout, labels, text, &mut out);
    table(layout, labels, chunk, &mut out);
    if let Some(block) = signature {
        signature_block(layout, block, &mut out);
    }
    footer(layout, labels, text, chunk.page_index, total_pages, &mut out);
    out
}

fn run(x_mm: f32, baseline_mm: f32, size_pt: f32, face: Face, text: impl Into<String>) -> TextRun {
    TextRun {
        x_mm,
        baseline_mm,
        size_pt,
        face,
        text: text.into(),
    }
}

/// Fit `value` into `column` and place it per the column's alignment.
fn cell(column: &Column, baseline_mm: f32, size_pt: f32, face: Face, value: &str) -> TextRun {
    let inner_width = column.width_mm - 2.0 * CELL_PADDING_MM;
    let fitted = fit_to_width(value, face, size_pt, inner_width);
    let width = face.text_width_mm(&fitted, size_pt);
    let x = aligned_x(column.x_mm + CELL_PADDING_MM, inner_width, width, column.align);
    run(x, baseline_mm, size_pt, face, fitted)
}

/// Quantity cell. The value is never shortened: one wider than the column
/// keeps its right edge and runs left into the name column.
fn quantity_cell(
    column: &Column,
    baseline_mm: f32,
    size_pt: f32,
    face: Face,
    value: &str,
) -> TextRun {
    let value = value.trim();
    let width = face.text_width_mm(value, size_pt);
    if width <= column.width_mm - 2.0 * CELL_PADDING_MM {
        return cell(column, baseline_mm, size_pt, face, value);
    }
    let x = column.right_mm() - CELL_PADDING_MM - width;
    run(x, baseline_mm, size_pt, face, value)
}

fn rule(region: Region, from: (f32, f32), to: (f32, f32), thickness_pt: f32) -> Element {
    Element {
        region,
        kind: ElementKind::Rule {
            from,
            to,
            thickness_pt,
        },
    }
}

fn header(layout: &LayoutConfig, labels: &Labels, text: &HeaderText, out: &mut Vec<Element>) {
    let fonts = &layout.fonts;
    let top = layout.bands.header_top_mm;
    let right = layout.content_right_mm();

    let org_x = if text.has_logo {
        out.push(Element {
            region: Region::Header,
            kind: ElementKind::Logo {
                rect: layout.logo_box,
            },
        });
        layout.logo_box.right_mm() + 4.0
    } else {
        layout.content_left_mm()
    };
    let org_width = IDENTITY_CAPTION_X_MM - 4.0 - org_x;

    let org_lines = [
        (5.0, fonts.heading_pt, layout.bold_face, text.org_name.clone()),
        (10.5, fonts.small_pt, layout.regular_face, text.org_address.clone()),
        (15.0, fonts.small_pt, layout.regular_face, text.contact_line(labels)),
    ];
    for (offset, size, face, value) in org_lines {
        let fitted = fit_to_width(&value, face, size, org_width);
        out.push(Element::text(Region::Header, run(org_x, top + offset, size, face, fitted)));
    }

    let title_width = layout.bold_face.text_width_mm(&text.title, fonts.title_pt);
    out.push(Element::text(
        Region::Header,
        run(right - title_width, top + 6.0, fonts.title_pt, layout.bold_face, &text.title),
    ));

    let value_width = right - IDENTITY_VALUE_X_MM;
    for (i, (caption, value)) in text.identity_lines(labels).into_iter().enumerate() {
        let baseline = top + 12.0 + i as f32 * 4.0;
        out.push(Element::text(
            Region::Header,
            run(IDENTITY_CAPTION_X_MM, baseline, fonts.small_pt, layout.regular_face, caption),
        ));
        let value = format!(": {value}");
        let fitted = fit_to_width(&value, layout.regular_face, fonts.small_pt, value_width);
        out.push(Element::text(
            Region::Header,
            run(IDENTITY_VALUE_X_MM, baseline, fonts.small_pt, layout.regular_face, fitted),
        ));
    }

    let y = layout.bands.header_bottom_mm;
    out.push(rule(
        Region::Header,
        (layout.content_left_mm(), y),
        (right, y),
        HEAVY_PT,
    ));
}

fn table(layout: &LayoutConfig, labels: &Labels, chunk: &PageChunk<'_>, out: &mut Vec<Element>) {
    let bands = &layout.bands;
    let columns = &layout.columns;
    let size = layout.fonts.body_pt;
    let top = bands.table_top_mm;
    let bottom = layout.table_bottom_mm();
    let rows_top = layout.first_row_top_mm();

    // The frame and separators cover the full capacity, whatever the chunk holds.
    out.push(Element {
        region: Region::Table,
        kind: ElementKind::Frame {
            rect: Rect {
                x_mm: columns.number.x_mm,
                y_mm: top,
                width_mm: columns.unit.right_mm() - columns.number.x_mm,
                height_mm: bottom - top,
            },
            thickness_pt: LIGHT_PT,
        },
    });
    out.push(rule(
        Region::Table,
        (columns.number.x_mm, rows_top),
        (columns.unit.right_mm(), rows_top),
        LIGHT_PT,
    ));
    for x in [columns.name.x_mm, columns.quantity.x_mm, columns.unit.x_mm] {
        out.push(rule(Region::Table, (x, top), (x, bottom), LIGHT_PT));
    }

    let header_baseline = top + bands.table_header_height_mm * BASELINE_RATIO;
    let captions = [
        (&columns.number, &labels.column_number),
        (&columns.name, &labels.column_name),
        (&columns.quantity, &labels.column_quantity),
        (&columns.unit, &labels.column_unit),
    ];
    for (column, caption) in captions {
        let centered = Column {
            align: Align::Center,
            ..*column
        };
        out.push(Element::text(
            Region::Table,
            cell(&centered, header_baseline, size, layout.bold_face, caption),
        ));
    }

    let face = layout.regular_face;
    for (i, row) in chunk.rows.iter().enumerate() {
        let row_top = rows_top + i as f32 * bands.row_height_mm;
        let baseline = row_top + bands.row_height_mm * BASELINE_RATIO;
        let number = (chunk.first_row_number + i).to_string();
        let quantity = row
            .quantity
            .formatted()
            .unwrap_or_else(|| labels.placeholder.clone());
        let unit = row.unit.as_deref().map(str::trim).unwrap_or_default();

        let quantity = quantity_cell(&columns.quantity, baseline, size, face, &quantity);
        // The name ends where a wide quantity begins.
        let name_column = Column {
            width_mm: columns
                .name
                .width_mm
                .min(quantity.x_mm - CELL_PADDING_MM - columns.name.x_mm)
                .max(0.0),
            ..columns.name
        };

        let cells = [
            cell(&columns.number, baseline, size, face, &number),
            cell(&name_column, baseline, size, face, &row.name),
            quantity,
        ];
        for run in cells {
            out.push(Element::text(Region::Table, run));
        }
        if !unit.is_empty() {
            let unit = cell(&columns.unit, baseline, size, face, unit);
            out.push(Element::text(Region::Table, unit));
        }
    }
}

fn signature_block(layout: &LayoutConfig, block: &SignatureBlock, out: &mut Vec<Element>) {
    let size = layout.fonts.body_pt;
    let face = layout.regular_face;
    for slot in &block.slots {
        let column = Column {
            x_mm: slot.x_mm,
            width_mm: slot.width_mm,
            align: slot.align,
        };
        let baseline = slot.label_top_mm + 4.0;
        let label = cell(&column, baseline, size, face, &slot.label);
        out.push(Element::text(Region::Signature, label));
        out.push(rule(
            Region::Signature,
            (slot.x_mm + 4.0, slot.rule_y_mm),
            (slot.x_mm + slot.width_mm - 4.0, slot.rule_y_mm),
            LIGHT_PT,
        ));
    }
}

fn footer(
    layout: &LayoutConfig,
    labels: &Labels,
    text: &HeaderText,
    page_index: usize,
    total_pages: usize,
    out: &mut Vec<Element>,
) {
    let size = layout.fonts.small_pt;
    let face = layout.regular_face;
    let baseline = layout.bands.footer_top_mm + layout.bands.footer_height_mm * BASELINE_RATIO;

    out.push(Element::text(
        Region::Footer,
        run(
            layout.content_left_mm(),
            baseline,
            size,
            face,
            format!("{} {}", text.title, text.number),
        ),
    ));

    let indicator = labels.page_indicator(page_index, total_pages);
    let width = face.text_width_mm(&indicator, size);
    out.push(Element::text(
        Region::Footer,
        run(layout.content_right_mm() - width, baseline, size, face, indicator),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use lembar_core::{DocumentHeader, ItemRow, Variant};

    fn table_runs(rows: &[ItemRow]) -> Vec<TextRun> {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let labels = Labels::default();
        let text = HeaderText::resolve(&DocumentHeader::default(), &labels);
        let chunk = PageChunk {
            page_index: 0,
            is_first_page: true,
            is_last_page: false,
            first_row_number: 1,
            rows,
        };
        elements(&layout, &labels, &text, &chunk, None, 1)
            .into_iter()
            .filter(|e| e.region == Region::Table)
            .filter_map(|e| match e.kind {
                ElementKind::Text(run) => Some(run),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn quantity_is_right_aligned_in_its_column() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let runs = table_runs(&[ItemRow::new("Semen", 10.0)]);
        let qty = runs.iter().find(|r| r.text == "10").unwrap();
        let end = qty.x_mm + layout.regular_face.text_width_mm("10", qty.size_pt);
        let column = layout.columns.quantity;
        assert!((end - (column.right_mm() - CELL_PADDING_MM)).abs() < 0.01);
    }

    #[test]
    fn wide_quantity_is_printed_in_full() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let long_name = "Besi beton ulir diameter 16 mm panjang 12 meter SNI grade BJTS 420 \
                         produksi Krakatau Steel untuk proyek gedung kantor lantai delapan";
        let runs = table_runs(&[ItemRow::new(long_name, 1234567890123456.5)]);

        let qty = runs.iter().find(|r| r.text == "1234567890123456.5").unwrap();
        let column = layout.columns.quantity;
        assert!(qty.x_mm < column.x_mm, "quantity should overflow left: {}", qty.x_mm);
        let end = qty.x_mm + layout.regular_face.text_width_mm(&qty.text, qty.size_pt);
        assert!((end - (column.right_mm() - CELL_PADDING_MM)).abs() < 0.01);

        let name = runs.iter().find(|r| r.text.starts_with("Besi")).unwrap();
        assert!(name.text.ends_with("..."), "{:?}", name.text);
        let name_end = name.x_mm + layout.regular_face.text_width_mm(&name.text, name.size_pt);
        assert!(name_end < qty.x_mm, "name ends at {name_end}, quantity at {}", qty.x_mm);
        assert!(runs.iter().all(|r| !r.text.contains("1234567890123456.5...")));
    }
}
