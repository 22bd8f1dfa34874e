// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font metrics and single-line text fitting.
//
// Only the PDF base-14 faces are used, so widths come from the Helvetica AFM
// advance table (1/1000 em) and the fixed 600/1000 em Courier advance.

use serde::Serialize;

use crate::config::Align;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

const ELLIPSIS: &str = "...";

/// A base-14 face the composers may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Face {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl Face {
    pub fn is_fixed_pitch(&self) -> bool {
        matches!(self, Self::Courier | Self::CourierBold)
    }

    /// Advance of `ch` in thousandths of an em.
    pub fn advance(&self, ch: char) -> u16 {
        match self {
            Self::Courier | Self::CourierBold => 600,
            Self::Helvetica => helvetica_advance(ch),
            // Bold glyphs run roughly 6% wider than regular.
            Self::HelveticaBold => helvetica_advance(ch) + helvetica_advance(ch) * 6 / 100,
        }
    }

    /// Width of `text` set at `size_pt`, in millimetres.
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let em_thousandths: u32 = text.chars().map(|ch| u32::from(self.advance(ch))).sum();
        em_thousandths as f32 / 1000.0 * size_pt / PT_PER_MM
    }
}

/// Helvetica advance widths for printable ASCII, from the Adobe AFM.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

fn helvetica_advance(ch: char) -> u16 {
    let code = ch as u32;
    if (0x20..0x7f).contains(&code) {
        HELVETICA_ASCII[(code - 0x20) as usize]
    } else {
        556
    }
}

/// Truncate `text` so it fits `max_width_mm`, marking the cut with `...`.
pub fn fit_to_width(text: &str, face: Face, size_pt: f32, max_width_mm: f32) -> String {
    let text = text.trim();
    if face.text_width_mm(text, size_pt) <= max_width_mm {
        return text.to_string();
    }
    let budget = max_width_mm - face.text_width_mm(ELLIPSIS, size_pt);
    let mut fitted = String::new();
    let mut used = 0.0;
    for ch in text.chars() {
        let w = face.text_width_mm(ch.encode_utf8(&mut [0; 4]), size_pt);
        if used + w > budget {
            break;
        }
        used += w;
        fitted.push(ch);
    }
    let mut fitted = fitted.trim_end().to_string();
    fitted.push_str(ELLIPSIS);
    fitted
}

/// Truncate `text` to at most `cells` characters, marking the cut with `...`.
pub fn fit_to_cells(text: &str, cells: usize) -> String {
    let text = text.trim();
    let len = text.chars().count();
    if len <= cells {
        return text.to_string();
    }
    if cells <= ELLIPSIS.len() {
        return text.chars().take(cells).collect();
    }
    let kept: String = text.chars().take(cells - ELLIPSIS.len()).collect();
    format!("{}{ELLIPSIS}", kept.trim_end())
}

/// Fit `text` into exactly `cells` characters, padded per `align`.
pub fn pad_cells(text: &str, cells: usize, align: Align) -> String {
    let fitted = fit_to_cells(text, cells);
    let gap = cells - fitted.chars().count();
    match align {
        Align::Left => format!("{fitted}{}", " ".repeat(gap)),
        Align::Right => format!("{}{fitted}", " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{fitted}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

/// X position where a run of `width_mm` starts when aligned in a box.
pub fn aligned_x(box_x_mm: f32, box_width_mm: f32, width_mm: f32, align: Align) -> f32 {
    match align {
        Align::Left => box_x_mm,
        Align::Right => box_x_mm + box_width_mm - width_mm,
        Align::Center => box_x_mm + (box_width_mm - width_mm) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_fixed_pitch() {
        // 10 characters of 12pt Courier are exactly one inch.
        let width = Face::Courier.text_width_mm("MMMMMiiiii", 12.0);
        assert!((width - 25.4).abs() < 0.01, "width was {width}");
    }

    #[test]
    fn helvetica_digits_are_tabular() {
        let a = Face::Helvetica.text_width_mm("1111", 9.0);
        let b = Face::Helvetica.text_width_mm("8888", 9.0);
        assert_eq!(a, b);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let regular = Face::Helvetica.text_width_mm("SURAT JALAN", 12.0);
        let bold = Face::HelveticaBold.text_width_mm("SURAT JALAN", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(fit_to_width("Semen", Face::Helvetica, 9.0, 50.0), "Semen");
        assert_eq!(fit_to_cells("Semen", 10), "Semen");
    }

    #[test]
    fn long_text_is_truncated_within_width() {
        let long = "Besi beton ulir diameter 16 mm panjang 12 meter SNI grade BJTS 420";
        let fitted = fit_to_width(long, Face::Helvetica, 9.0, 40.0);
        assert!(fitted.ends_with("..."));
        assert!(Face::Helvetica.text_width_mm(&fitted, 9.0) <= 40.0);
    }

    #[test]
    fn cells_truncate_with_marker() {
        assert_eq!(fit_to_cells("Pasir Bangka", 8), "Pasir...");
        assert_eq!(fit_to_cells("Pasir", 2), "Pa");
    }

    #[test]
    fn pad_cells_aligns() {
        assert_eq!(pad_cells("12", 5, Align::Right), "   12");
        assert_eq!(pad_cells("12", 5, Align::Left), "12   ");
        assert_eq!(pad_cells("ab", 6, Align::Center), "  ab  ");
    }

    #[test]
    fn aligned_x_positions() {
        assert_eq!(aligned_x(10.0, 30.0, 10.0, Align::Left), 10.0);
        assert_eq!(aligned_x(10.0, 30.0, 10.0, Align::Right), 30.0);
        assert_eq!(aligned_x(10.0, 30.0, 10.0, Align::Center), 20.0);
    }
}
