// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dot-matrix page rules: everything is Courier text on the 10 cpi / 6 lpi
// character grid. Rules are runs of '-' and '_' so the page prints cleanly on
// impact printers and lines up with pre-printed continuous stationery.

use lembar_core::Labels;

use super::{Element, HeaderText, Region, TextRun};
use crate::chunk::PageChunk;
use crate::config::{Align, Column, Grid, LayoutConfig};
use crate::metrics::{fit_to_cells, pad_cells};
use crate::signature::SignatureBlock;

/// Where the right-hand identity block starts, in grid columns.
const IDENTITY_COL: usize = 52;
/// Baseline sits at this fraction of the line pitch.
const BASELINE_RATIO: f32 = 0.75;

/// Places text on grid cells of one layout.
struct Sheet<'a> {
    layout: &'a LayoutConfig,
    grid: Grid,
    out: Vec<Element>,
}

impl Sheet<'_> {
    fn put(
        &mut self,
        region: Region,
        line: usize,
        col: usize,
        bold: bool,
        text: impl Into<String>,
    ) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        let face = if bold {
            self.layout.bold_face
        } else {
            self.layout.regular_face
        };
        self.out.push(Element::text(
            region,
            TextRun {
                x_mm: self.grid.col_x_mm(col),
                baseline_mm: self.grid.line_top_mm(line)
                    + self.grid.line_height_mm() * BASELINE_RATIO,
                size_pt: self.layout.fonts.body_pt,
                face,
                text,
            },
        ));
    }

    fn col_of(&self, x_mm: f32) -> usize {
        self.grid.cells(x_mm)
    }

    fn line_of(&self, y_mm: f32) -> usize {
        self.grid.line_at(y_mm)
    }

    fn left_col(&self) -> usize {
        self.col_of(self.layout.content_left_mm())
    }

    fn right_col(&self) -> usize {
        self.col_of(self.layout.content_right_mm())
    }

    fn content_cells(&self) -> usize {
        self.right_col() - self.left_col()
    }

    /// Text right-aligned so it ends at the content edge.
    fn put_right(&mut self, region: Region, line: usize, bold: bool, text: &str) {
        let fitted = fit_to_cells(text, self.content_cells());
        let col = self.right_col() - fitted.chars().count();
        self.put(region, line, col, bold, fitted);
    }

    fn dashes(&mut self, region: Region, line: usize) {
        let cells = self.content_cells();
        let col = self.left_col();
        self.put(region, line, col, false, "-".repeat(cells));
    }

    /// First cell of `column`, relative to the content edge.
    fn offset_of(&self, column: &Column) -> usize {
        self.col_of(column.x_mm) - self.left_col()
    }

    /// One table line from (column, text) pairs, padded into their cells.
    fn table_line(&self, cells: &[(&Column, &str)]) -> String {
        let mut line: Vec<char> = vec![' '; self.content_cells()];
        for (column, text) in cells {
            let width = self.grid.cells(column.width_mm);
            write_at(&mut line, self.offset_of(column), &pad_cells(text, width, column.align));
        }
        finish(line)
    }

    /// One item row. The quantity is printed in full; when it is wider than
    /// its column it starts further left and the name gives up the cells.
    fn item_line(&self, number: &str, name: &str, quantity: &str, unit: &str) -> String {
        let columns = &self.layout.columns;
        let quantity = quantity.trim();
        let quantity_cells = self.grid.cells(columns.quantity.width_mm);
        let quantity_end = self.offset_of(&columns.quantity) + quantity_cells;
        let name_start = self.offset_of(&columns.name);
        let quantity_start = quantity_end
            .saturating_sub(quantity.chars().count())
            .max(name_start);
        let name_cells = self
            .grid
            .cells(columns.name.width_mm)
            .min(quantity_start.saturating_sub(name_start + 1));
        let unit_start = self
            .offset_of(&columns.unit)
            .max(quantity_start + quantity.chars().count() + 1);

        let mut line: Vec<char> = vec![' '; self.content_cells()];
        let number_cells = self.grid.cells(columns.number.width_mm);
        write_at(
            &mut line,
            self.offset_of(&columns.number),
            &pad_cells(number, number_cells, columns.number.align),
        );
        write_at(&mut line, name_start, &fit_to_cells(name, name_cells));
        write_at(&mut line, quantity_start, quantity);
        let unit_cells = self.grid.cells(columns.unit.width_mm);
        write_at(&mut line, unit_start, &fit_to_cells(unit, unit_cells));
        finish(line)
    }
}

fn write_at(line: &mut Vec<char>, start: usize, text: &str) {
    for (offset, ch) in text.chars().enumerate() {
        let at = start + offset;
        if at >= line.len() {
            line.resize(at + 1, ' ');
        }
        line[at] = ch;
    }
}

fn finish(line: Vec<char>) -> String {
    line.into_iter().collect::<String>().trim_end().to_string()
}

pub(super) fn elements(
    layout: &LayoutConfig,
    labels: &Labels,
    text: &HeaderText,
    chunk: &PageChunk<'_>,
    signature: Option<&SignatureBlock>,
    total_pages: usize,
) -> Vec<Element> {
    // Fixed-pitch layouts always carry a grid; fall back to 10 cpi / 6 lpi.
    let grid = layout.grid.unwrap_or(Grid {
        chars_per_inch: 10.0,
        lines_per_inch: 6.0,
    });
    let mut sheet = Sheet {
        layout,
        grid,
        out: Vec::new(),
    };
    header(&mut sheet, labels, text);
    table(&mut sheet, labels, chunk);
    if let Some(block) = signature {
        signature_block(&mut sheet, block);
    }
    footer(&mut sheet, labels, text, chunk.page_index, total_pages);
    sheet.out
}

fn header(sheet: &mut Sheet<'_>, labels: &Labels, text: &HeaderText) {
    let layout = sheet.layout;
    let first = sheet.line_of(layout.bands.header_top_mm);

    let org_col = if text.has_logo {
        sheet.out.push(Element {
            region: Region::Header,
            kind: super::ElementKind::Logo {
                rect: layout.logo_box,
            },
        });
        sheet.col_of(layout.logo_box.right_mm()) + 1
    } else {
        sheet.left_col()
    };
    let org_cells = IDENTITY_COL - 2 - org_col;

    let org_name = fit_to_cells(&text.org_name, org_cells);
    sheet.put(Region::Header, first, org_col, true, org_name);
    let org_address = fit_to_cells(&text.org_address, org_cells);
    sheet.put(Region::Header, first + 1, org_col, false, org_address);
    sheet.put(
        Region::Header,
        first + 2,
        org_col,
        false,
        fit_to_cells(&text.contact_line(labels), org_cells),
    );

    sheet.put_right(Region::Header, first, true, &text.title);

    let identity = text.identity_lines(labels);
    let caption_cells = identity
        .iter()
        .map(|(caption, _)| caption.chars().count())
        .max()
        .unwrap_or(0);
    let value_cells = sheet
        .right_col()
        .saturating_sub(IDENTITY_COL + caption_cells + 2);
    for (i, (caption, value)) in identity.into_iter().enumerate() {
        let line = format!(
            "{}: {}",
            pad_cells(caption, caption_cells, Align::Left),
            fit_to_cells(value, value_cells)
        );
        sheet.put(Region::Header, first + 1 + i, IDENTITY_COL, false, line);
    }

    let rule_line = sheet.line_of(layout.bands.header_bottom_mm);
    sheet.dashes(Region::Header, rule_line);
}

fn table(sheet: &mut Sheet<'_>, labels: &Labels, chunk: &PageChunk<'_>) {
    let layout = sheet.layout;
    let columns = &layout.columns;
    let top = sheet.line_of(layout.bands.table_top_mm);
    let first_row = sheet.line_of(layout.first_row_top_mm());
    let closing = sheet.line_of(layout.table_bottom_mm());
    let left = sheet.left_col();

    let captions = sheet.table_line(&[
        (&columns.number, labels.column_number.as_str()),
        (&columns.name, labels.column_name.as_str()),
        (&columns.quantity, labels.column_quantity.as_str()),
        (&columns.unit, labels.column_unit.as_str()),
    ]);
    sheet.put(Region::Table, top, left, true, captions);
    sheet.dashes(Region::Table, first_row - 1);

    for (i, row) in chunk.rows.iter().enumerate() {
        let number = format!("{}.", chunk.first_row_number + i);
        let quantity = row
            .quantity
            .formatted()
            .unwrap_or_else(|| labels.placeholder.clone());
        let unit = row.unit.as_deref().unwrap_or_default();
        let line = sheet.item_line(&number, &row.name, &quantity, unit);
        sheet.put(Region::Table, first_row + i, left, false, line);
    }

    // Closing rule sits below the last reserved row, not the last used one.
    sheet.dashes(Region::Table, closing);
}

fn signature_block(sheet: &mut Sheet<'_>, block: &SignatureBlock) {
    for slot in &block.slots {
        let col = sheet.col_of(slot.x_mm);
        let cells = sheet.grid.cells(slot.width_mm);
        let label_line = sheet.line_of(slot.label_top_mm);
        let rule_line = sheet.line_of(slot.rule_y_mm);
        let label = pad_cells(&slot.label, cells, slot.align);
        sheet.put(Region::Signature, label_line, col, false, label.trim_end());
        sheet.put(Region::Signature, rule_line, col, false, "_".repeat(cells));
    }
}

fn footer(
    sheet: &mut Sheet<'_>,
    labels: &Labels,
    text: &HeaderText,
    page_index: usize,
    total_pages: usize,
) {
    let line = sheet.line_of(sheet.layout.bands.footer_top_mm);
    let left = sheet.left_col();
    let indicator = labels.page_indicator(page_index, total_pages);
    let reference_cells = sheet.content_cells().saturating_sub(indicator.chars().count() + 2);
    sheet.put(
        Region::Footer,
        line,
        left,
        false,
        fit_to_cells(&format!("{} {}", text.title, text.number), reference_cells),
    );
    sheet.put_right(Region::Footer, line, false, &indicator);
}
