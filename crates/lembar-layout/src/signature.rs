// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature block: one box per signing party, side by side across the
// content width, each with a caption and a rule for the handwritten mark.

use lembar_core::SignatureParty;
use lembar_core::error::{LembarError, Result};
use serde::Serialize;

use crate::config::{Align, LayoutConfig};

/// Placement of one signing party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureSlot {
    pub label: String,
    pub x_mm: f32,
    pub width_mm: f32,
    /// Top of the caption line.
    pub label_top_mm: f32,
    /// Vertical position of the acknowledgment rule.
    pub rule_y_mm: f32,
    pub align: Align,
}

/// The fixed signature layout of a variant, independent of document content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureBlock {
    pub slots: Vec<SignatureSlot>,
}

impl SignatureBlock {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.label.as_str())
    }
}

/// Lays out signature slots inside the signature band of a layout.
pub struct SignatureBlockBuilder<'a> {
    layout: &'a LayoutConfig,
}

impl<'a> SignatureBlockBuilder<'a> {
    pub fn new(layout: &'a LayoutConfig) -> Self {
        Self { layout }
    }

    /// Slots in party order, splitting the content width evenly.
    ///
    /// Fails when there is no party to sign, or when the parties cannot share
    /// the content width with at least one character cell each.
    pub fn build(&self, parties: &[SignatureParty]) -> Result<SignatureBlock> {
        let layout = self.layout;
        if parties.is_empty() {
            return Err(LembarError::InvalidTemplate(format!(
                "the {} signature block needs at least one party",
                layout.variant
            )));
        }

        let band_top = layout.bands.signature_top_mm;
        let band_bottom = layout.signature_bottom_mm();
        // Rule sits one row above the band bottom, leaving the space between
        // caption and rule for the signature itself.
        let rule_y_mm = band_bottom - layout.bands.row_height_mm;

        let gutter_mm = match layout.grid {
            Some(grid) => grid.char_width_mm() * 2.0,
            None => 6.0,
        };
        let count = parties.len() as f32;
        let slot_width = (layout.content_width_mm() - gutter_mm * (count - 1.0)) / count;
        let slot_width = match layout.grid {
            // Whole character cells so captions and rules stay on the grid.
            Some(grid) => (slot_width / grid.char_width_mm()).floor() * grid.char_width_mm(),
            None => slot_width,
        };
        let min_width = match layout.grid {
            Some(grid) => grid.char_width_mm(),
            None => f32::EPSILON,
        };
        if slot_width < min_width {
            return Err(LembarError::InvalidTemplate(format!(
                "{} signature parties do not fit the {} signature band",
                parties.len(),
                layout.variant
            )));
        }

        let slots = parties
            .iter()
            .enumerate()
            .map(|(i, party)| SignatureSlot {
                label: party.label().trim().to_string(),
                x_mm: layout.content_left_mm() + i as f32 * (slot_width + gutter_mm),
                width_mm: slot_width,
                label_top_mm: band_top,
                rule_y_mm,
                align: layout.signature_label_align,
            })
            .collect();

        Ok(SignatureBlock { slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lembar_core::{SignatureTemplate, Variant};

    fn parties() -> Vec<SignatureParty> {
        SignatureTemplate::default().standard
    }

    #[test]
    fn slots_follow_party_order() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let block = SignatureBlockBuilder::new(&layout).build(&parties()).unwrap();
        let labels: Vec<&str> = block.labels().collect();
        assert_eq!(labels, ["Pengirim", "Sopir/Ekspedisi", "Penerima"]);
    }

    #[test]
    fn slots_stay_inside_content_area_and_band() {
        for variant in Variant::ALL {
            let layout = LayoutConfig::for_variant(variant);
            let block = SignatureBlockBuilder::new(&layout).build(&parties()).unwrap();
            for pair in block.slots.windows(2) {
                assert!(pair[0].x_mm + pair[0].width_mm < pair[1].x_mm);
            }
            let last = block.slots.last().unwrap();
            assert!(last.x_mm + last.width_mm <= layout.content_right_mm() + 0.01);
            for slot in &block.slots {
                assert!(slot.rule_y_mm > slot.label_top_mm);
                assert!(slot.rule_y_mm <= layout.signature_bottom_mm());
            }
        }
    }

    #[test]
    fn dot_matrix_slots_are_whole_cells() {
        let layout = LayoutConfig::for_variant(Variant::DotMatrix);
        let grid = layout.grid.unwrap();
        let block = SignatureBlockBuilder::new(&layout).build(&parties()).unwrap();
        for slot in &block.slots {
            let cells = slot.width_mm / grid.char_width_mm();
            assert!((cells - cells.round()).abs() < 0.001);
            assert_eq!(slot.align, Align::Left);
        }
    }

    #[test]
    fn same_parties_same_block() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let builder = SignatureBlockBuilder::new(&layout);
        assert_eq!(builder.build(&parties()).unwrap(), builder.build(&parties()).unwrap());
    }

    #[test]
    fn any_party_count_is_supported() {
        let layout = LayoutConfig::for_variant(Variant::Standard);
        let five: Vec<SignatureParty> =
            ["A", "B", "C", "D", "E"].into_iter().map(SignatureParty::new).collect();
        let block = SignatureBlockBuilder::new(&layout).build(&five).unwrap();
        assert_eq!(block.slots.len(), 5);
    }

    #[test]
    fn no_parties_is_rejected() {
        for variant in Variant::ALL {
            let layout = LayoutConfig::for_variant(variant);
            let err = SignatureBlockBuilder::new(&layout).build(&[]).unwrap_err();
            assert!(matches!(err, LembarError::InvalidTemplate(_)), "{variant}: {err}");
        }
    }

    #[test]
    fn parties_narrower_than_a_cell_are_rejected() {
        let layout = LayoutConfig::for_variant(Variant::DotMatrix);
        let crowd: Vec<SignatureParty> =
            (1..=40).map(|i| SignatureParty::new(format!("P{i}"))).collect();
        let err = SignatureBlockBuilder::new(&layout).build(&crowd).unwrap_err();
        assert!(matches!(err, LembarError::InvalidTemplate(_)), "{err}");
    }
}
