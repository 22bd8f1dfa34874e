// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-variant measurement and layout constants.
//
// All lengths are millimetres measured from the top-left corner of the page,
// y growing downwards. Both variants target half-letter landscape
// (8.5in x 5.5in). The dot-matrix bands are whole multiples of the 6 lpi
// line so every element lands on the printer's character grid.

use lembar_core::Variant;
use serde::Serialize;

use crate::metrics::Face;

/// Half-letter landscape width (8.5in).
pub const HALF_LETTER_WIDTH_MM: f32 = 215.9;
/// Half-letter landscape height (5.5in).
pub const HALF_LETTER_HEIGHT_MM: f32 = 139.7;

const MM_PER_INCH: f32 = 25.4;

/// Horizontal alignment inside a column or slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// One item-table column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column {
    pub x_mm: f32,
    pub width_mm: f32,
    pub align: Align,
}

impl Column {
    pub fn right_mm(&self) -> f32 {
        self.x_mm + self.width_mm
    }
}

/// The fixed item-table columns. Widths never depend on chunk content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableColumns {
    pub number: Column,
    pub name: Column,
    pub quantity: Column,
    pub unit: Column,
}

/// Vertical bands of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bands {
    pub header_top_mm: f32,
    pub header_bottom_mm: f32,
    pub table_top_mm: f32,
    pub table_header_height_mm: f32,
    pub row_height_mm: f32,
    pub signature_top_mm: f32,
    pub signature_height_mm: f32,
    pub footer_top_mm: f32,
    pub footer_height_mm: f32,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSizes {
    pub title_pt: f32,
    pub heading_pt: f32,
    pub body_pt: f32,
    pub small_pt: f32,
}

/// Fixed character grid of an impact printer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Grid {
    pub chars_per_inch: f32,
    pub lines_per_inch: f32,
}

impl Grid {
    pub fn char_width_mm(&self) -> f32 {
        MM_PER_INCH / self.chars_per_inch
    }

    pub fn line_height_mm(&self) -> f32 {
        MM_PER_INCH / self.lines_per_inch
    }

    /// Character cells spanned by `width_mm`.
    pub fn cells(&self, width_mm: f32) -> usize {
        (width_mm / self.char_width_mm()).round() as usize
    }

    /// Grid line whose top edge is at `y_mm`.
    pub fn line_at(&self, y_mm: f32) -> usize {
        (y_mm / self.line_height_mm()).round() as usize
    }

    pub fn line_top_mm(&self, line: usize) -> f32 {
        line as f32 * self.line_height_mm()
    }

    pub fn col_x_mm(&self, col: usize) -> f32 {
        col as f32 * self.char_width_mm()
    }
}

/// Immutable layout for one document variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub variant: Variant,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margins: Margins,
    /// Item rows per page. Also the capacity handed to the chunker.
    pub rows_per_page: usize,
    pub columns: TableColumns,
    pub bands: Bands,
    pub fonts: FontSizes,
    pub regular_face: Face,
    pub bold_face: Face,
    /// Logo box, used only when the organization has a logo.
    pub logo_box: Rect,
    pub signature_label_align: Align,
    /// Present for fixed-pitch variants.
    pub grid: Option<Grid>,
}

/// Axis-aligned rectangle in millimetres, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Rect {
    pub fn bottom_mm(&self) -> f32 {
        self.y_mm + self.height_mm
    }

    pub fn right_mm(&self) -> f32 {
        self.x_mm + self.width_mm
    }
}

impl LayoutConfig {
    /// The layout for `variant`. A fresh value each call; nothing is shared.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Standard => Self::standard(),
            Variant::DotMatrix => Self::dot_matrix(),
        }
    }

    pub fn content_left_mm(&self) -> f32 {
        self.margins.left
    }

    pub fn content_right_mm(&self) -> f32 {
        self.page_width_mm - self.margins.right
    }

    pub fn content_width_mm(&self) -> f32 {
        self.content_right_mm() - self.content_left_mm()
    }

    /// Top of the first item row.
    pub fn first_row_top_mm(&self) -> f32 {
        self.bands.table_top_mm + self.bands.table_header_height_mm
    }

    /// Bottom of the table region, reserved in full on every page.
    pub fn table_bottom_mm(&self) -> f32 {
        self.first_row_top_mm() + self.rows_per_page as f32 * self.bands.row_height_mm
    }

    pub fn signature_bottom_mm(&self) -> f32 {
        self.bands.signature_top_mm + self.bands.signature_height_mm
    }

    pub fn footer_bottom_mm(&self) -> f32 {
        self.bands.footer_top_mm + self.bands.footer_height_mm
    }

    fn standard() -> Self {
        let margins = Margins {
            top: 8.0,
            right: 10.0,
            bottom: 6.0,
            left: 10.0,
        };
        Self {
            variant: Variant::Standard,
            page_width_mm: HALF_LETTER_WIDTH_MM,
            page_height_mm: HALF_LETTER_HEIGHT_MM,
            margins,
            rows_per_page: 10,
            columns: TableColumns {
                number: Column {
                    x_mm: 10.0,
                    width_mm: 10.0,
                    align: Align::Center,
                },
                name: Column {
                    x_mm: 20.0,
                    width_mm: 125.9,
                    align: Align::Left,
                },
                quantity: Column {
                    x_mm: 145.9,
                    width_mm: 30.0,
                    align: Align::Right,
                },
                unit: Column {
                    x_mm: 175.9,
                    width_mm: 30.0,
                    align: Align::Left,
                },
            },
            bands: Bands {
                header_top_mm: 8.0,
                header_bottom_mm: 36.0,
                table_top_mm: 39.0,
                table_header_height_mm: 6.0,
                row_height_mm: 5.0,
                signature_top_mm: 99.0,
                signature_height_mm: 24.0,
                footer_top_mm: 127.0,
                footer_height_mm: 5.0,
            },
            fonts: FontSizes {
                title_pt: 14.0,
                heading_pt: 12.0,
                body_pt: 9.0,
                small_pt: 8.0,
            },
            regular_face: Face::Helvetica,
            bold_face: Face::HelveticaBold,
            logo_box: Rect {
                x_mm: 10.0,
                y_mm: 9.0,
                width_mm: 24.0,
                height_mm: 24.0,
            },
            signature_label_align: Align::Center,
            grid: None,
        }
    }

    fn dot_matrix() -> Self {
        // 10 cpi / 6 lpi: 85 columns by 33 lines on half-letter landscape.
        let grid = Grid {
            chars_per_inch: 10.0,
            lines_per_inch: 6.0,
        };
        let col = |c: usize| grid.col_x_mm(c);
        let line = |l: usize| grid.line_top_mm(l);

        Self {
            variant: Variant::DotMatrix,
            page_width_mm: HALF_LETTER_WIDTH_MM,
            page_height_mm: HALF_LETTER_HEIGHT_MM,
            margins: Margins {
                top: line(1),
                right: col(3),
                bottom: line(2),
                left: col(2),
            },
            rows_per_page: 7,
            columns: TableColumns {
                number: Column {
                    x_mm: col(2),
                    width_mm: col(4),
                    align: Align::Right,
                },
                name: Column {
                    x_mm: col(7),
                    width_mm: col(48),
                    align: Align::Left,
                },
                quantity: Column {
                    x_mm: col(56),
                    width_mm: col(10),
                    align: Align::Right,
                },
                unit: Column {
                    x_mm: col(68),
                    width_mm: col(14),
                    align: Align::Left,
                },
            },
            bands: Bands {
                header_top_mm: line(1),
                header_bottom_mm: line(6),
                table_top_mm: line(7),
                table_header_height_mm: line(2),
                row_height_mm: line(1),
                signature_top_mm: line(18),
                signature_height_mm: line(6),
                footer_top_mm: line(25),
                footer_height_mm: line(1),
            },
            // Courier at 12pt advances exactly 7.2pt = 1/10in per glyph.
            fonts: FontSizes {
                title_pt: 12.0,
                heading_pt: 12.0,
                body_pt: 12.0,
                small_pt: 12.0,
            },
            regular_face: Face::Courier,
            bold_face: Face::CourierBold,
            logo_box: Rect {
                x_mm: col(2),
                y_mm: line(1),
                width_mm: col(8),
                height_mm: line(4),
            },
            signature_label_align: Align::Left,
            grid: Some(grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_stacks_on_page(layout: &LayoutConfig) {
        let b = &layout.bands;
        assert!(b.header_top_mm >= layout.margins.top - 0.01);
        assert!(b.header_bottom_mm <= b.table_top_mm);
        assert!(layout.table_bottom_mm() <= b.signature_top_mm);
        assert!(layout.signature_bottom_mm() <= b.footer_top_mm);
        assert!(
            layout.footer_bottom_mm() <= layout.page_height_mm - layout.margins.bottom + 0.01,
            "{:?} footer runs into the bottom margin",
            layout.variant
        );
        assert!(layout.logo_box.bottom_mm() <= b.header_bottom_mm);
    }

    fn assert_columns_in_content_area(layout: &LayoutConfig) {
        let c = &layout.columns;
        let ordered = [c.number, c.name, c.quantity, c.unit];
        assert!(ordered[0].x_mm >= layout.content_left_mm() - 0.01);
        for pair in ordered.windows(2) {
            assert!(pair[0].right_mm() <= pair[1].x_mm + 0.01);
        }
        assert!(ordered[3].right_mm() <= layout.content_right_mm() + 0.01);
    }

    #[test]
    fn standard_layout_fits_half_letter() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        assert_stacks_on_page(&layout);
        assert_columns_in_content_area(&layout);
    }

    #[test]
    fn dot_matrix_layout_fits_half_letter() {
        let layout = LayoutConfig::for_variant(Variant::DotMatrix);
        assert_stacks_on_page(&layout);
        assert_columns_in_content_area(&layout);
    }

    #[test]
    fn both_variants_are_half_letter_landscape() {
        for variant in Variant::ALL {
            let layout = LayoutConfig::for_variant(variant);
            assert_eq!(layout.page_width_mm, HALF_LETTER_WIDTH_MM);
            assert_eq!(layout.page_height_mm, HALF_LETTER_HEIGHT_MM);
            assert!(layout.page_width_mm > layout.page_height_mm);
        }
    }

    #[test]
    fn dot_matrix_is_tighter_than_standard() {
        let standard = LayoutConfig::for_variant(Variant::Standard);
        let dot_matrix = LayoutConfig::for_variant(Variant::DotMatrix);
        assert!(dot_matrix.rows_per_page < standard.rows_per_page);
        assert!(standard.grid.is_none());
        assert!(dot_matrix.grid.is_some());
    }

    #[test]
    fn dot_matrix_grid_is_85_by_33() {
        let layout = LayoutConfig::for_variant(Variant::DotMatrix);
        let grid = layout.grid.unwrap();
        assert_eq!(grid.cells(layout.page_width_mm), 85);
        assert_eq!(grid.line_at(layout.page_height_mm), 33);
        assert_eq!(grid.cells(layout.content_width_mm()), 80);
    }

    #[test]
    fn dot_matrix_bands_sit_on_grid_lines() {
        let layout = LayoutConfig::for_variant(Variant::DotMatrix);
        let grid = layout.grid.unwrap();
        let b = layout.bands;
        for y in [b.header_top_mm, b.table_top_mm, b.signature_top_mm, b.footer_top_mm] {
            let line = grid.line_at(y);
            assert!((grid.line_top_mm(line) - y).abs() < 0.001);
        }
    }
}
